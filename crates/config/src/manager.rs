//! Configuration manager
//!
//! Settings resolve in three layers: built-in defaults first, then the JSON
//! file named by `CHURN_CONFIG_PATH` when one is set, then `CHURN_*`
//! environment variables. Later layers win.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use common::{Error, Result};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "CHURN_CONFIG_PATH";

/// Prefix environment overrides carry, e.g. `CHURN_MODELS_DIR`
pub const ENV_PREFIX: &str = "CHURN_";

static DEFAULTS: Lazy<Vec<(&'static str, Value)>> = Lazy::new(|| {
    vec![
        ("models_dir", Value::String("models".to_string())),
        ("default_model_version", Value::String("v1_lr".to_string())),
        ("eager_load", Value::Bool(true)),
    ]
});

/// Configuration manager with layered sources
pub struct ConfigManager {
    /// Resolved settings (key -> value)
    values: DashMap<String, Value>,
}

impl ConfigManager {
    /// Creates a manager from defaults, the file named by `CHURN_CONFIG_PATH`
    /// when set, and `CHURN_*` environment overrides
    pub fn new() -> Result<Self> {
        let manager = Self::with_defaults();

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            manager.load_file(Path::new(&path))?;
        }

        manager.apply_env_overrides(std::env::vars());

        Ok(manager)
    }

    /// Creates a manager carrying only the built-in defaults
    pub fn with_defaults() -> Self {
        let values = DashMap::new();

        for (key, value) in DEFAULTS.iter() {
            values.insert(key.to_string(), value.clone());
        }

        Self { values }
    }

    /// Merges a JSON object file into the settings
    pub fn load_file(&self, path: &Path) -> Result<()> {
        info!("Loading configuration from {}", path.display());

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;

        let parsed: Value = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;

        let object = parsed
            .as_object()
            .ok_or_else(|| Error::Config(format!("{} must hold a JSON object", path.display())))?;

        for (key, value) in object {
            self.values.insert(key.clone(), value.clone());
        }

        Ok(())
    }

    /// Applies `CHURN_*` variables as overrides. `CHURN_MODELS_DIR` becomes
    /// the `models_dir` key; values parse as JSON where possible and fall
    /// back to plain strings.
    pub fn apply_env_overrides(&self, vars: impl Iterator<Item = (String, String)>) {
        for (name, raw) in vars {
            if name == CONFIG_PATH_ENV {
                continue;
            }

            if let Some(suffix) = name.strip_prefix(ENV_PREFIX) {
                let key = suffix.to_lowercase();
                let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));

                debug!("Overriding '{}' from the environment", key);
                self.values.insert(key, value);
            }
        }
    }

    /// Sets a single value
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Gets a raw value
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).map(|value| value.clone())
    }

    /// Gets a string value
    pub fn get_str(&self, key: &str) -> Result<String> {
        match self.get(key) {
            Some(Value::String(value)) => Ok(value),
            Some(other) => Err(Error::Config(format!(
                "setting '{key}' is not a string: {other}"
            ))),
            None => Err(Error::Config(format!("setting '{key}' is not set"))),
        }
    }

    /// Gets a path value
    pub fn get_path(&self, key: &str) -> Result<PathBuf> {
        Ok(PathBuf::from(self.get_str(key)?))
    }

    /// Gets a boolean value
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            Some(Value::Bool(value)) => Ok(value),
            Some(other) => Err(Error::Config(format!(
                "setting '{key}' is not a boolean: {other}"
            ))),
            None => Err(Error::Config(format!("setting '{key}' is not set"))),
        }
    }

    /// Gets a non-negative integer value
    pub fn get_usize(&self, key: &str) -> Result<usize> {
        match self.get(key) {
            Some(Value::Number(number)) => number
                .as_u64()
                .map(|value| value as usize)
                .ok_or_else(|| {
                    Error::Config(format!("setting '{key}' is not a non-negative integer"))
                }),
            Some(other) => Err(Error::Config(format!(
                "setting '{key}' is not a number: {other}"
            ))),
            None => Err(Error::Config(format!("setting '{key}' is not set"))),
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}
