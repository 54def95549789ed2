//! Main integration module for the churn serving system
//!
//! This module wires the configuration manager and the model registry
//! together and provides the serving entry points a transport layer
//! consumes: single and batch prediction, model status, and health.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use common::models::{BatchPrediction, HealthReport, ModelInfo, Prediction};
use common::{Error, Result};
use config::ConfigManager;
use feature_schema::CustomerRecord;
use model_registry::{artifact_file, ModelRegistry, DEFAULT_MODEL_VERSION};
use model_service::{ModelService, PageRequest};

/// Largest number of records one batch request may carry
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Main churn predictor
pub struct ChurnPredictor {
    /// Configuration manager
    config_manager: Arc<ConfigManager>,

    /// Model registry
    registry: Arc<ModelRegistry>,

    /// Version used when a request names none
    default_version: String,
}

impl ChurnPredictor {
    /// Creates a predictor from process configuration
    pub async fn new() -> Result<Self> {
        let config_manager = Arc::new(ConfigManager::new()?);
        Self::with_config(config_manager).await
    }

    /// Creates a predictor over an existing configuration manager.
    ///
    /// When `eager_load` is set, every cataloged model is loaded up front,
    /// best effort; versions that fail stay loadable on first use.
    pub async fn with_config(config_manager: Arc<ConfigManager>) -> Result<Self> {
        info!("Initializing churn predictor");

        let models_dir = config_manager
            .get_path("models_dir")
            .unwrap_or_else(|_| PathBuf::from("models"));

        let default_version = config_manager
            .get_str("default_model_version")
            .unwrap_or_else(|_| DEFAULT_MODEL_VERSION.to_string());

        let eager_load = config_manager.get_bool("eager_load").unwrap_or(true);

        if artifact_file(&default_version).is_none() {
            return Err(Error::Config(format!(
                "default model version '{default_version}' is not in the catalog"
            )));
        }

        let registry = Arc::new(ModelRegistry::new(models_dir));

        let predictor = Self {
            config_manager,
            registry,
            default_version,
        };

        if eager_load {
            let loaded = predictor.registry.load_all().await;
            if loaded == 0 {
                warn!("No models could be loaded at startup");
            }
        }

        Ok(predictor)
    }

    /// Initializes logging
    pub fn init_logging() -> Result<()> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .map_err(|e| Error::Config(format!("failed to initialize logging: {e}")))?;

        Ok(())
    }

    fn resolve_version<'a>(&'a self, version: Option<&'a str>) -> &'a str {
        version.unwrap_or(&self.default_version)
    }

    /// Scores one customer record with the named version, or the default
    pub async fn predict_single(
        &self,
        version: Option<&str>,
        record: &CustomerRecord,
    ) -> Result<Prediction> {
        let service = self.registry.get_model(self.resolve_version(version)).await?;
        service.predict_single(record)
    }

    /// Scores a batch of customer records, optionally one page of it.
    ///
    /// The batch must be non-empty and within `MAX_BATCH_SIZE`; `total_count`
    /// in the result always reflects the full batch.
    pub async fn predict_batch(
        &self,
        version: Option<&str>,
        records: &[CustomerRecord],
        page: Option<PageRequest>,
    ) -> Result<BatchPrediction> {
        if records.is_empty() {
            return Err(Error::InvalidArgument(
                "batch must contain at least one record".to_string(),
            ));
        }

        if records.len() > MAX_BATCH_SIZE {
            return Err(Error::InvalidArgument(format!(
                "batch has {} records, limit is {MAX_BATCH_SIZE}",
                records.len()
            )));
        }

        let service = self.registry.get_model(self.resolve_version(version)).await?;
        service.predict_batch(records, page)
    }

    /// Gets the service for a version, loading it on first use
    pub async fn get_model(&self, version: Option<&str>) -> Result<Arc<ModelService>> {
        self.registry.get_model(self.resolve_version(version)).await
    }

    /// Status snapshot of every cataloged model
    pub fn list_models(&self) -> Vec<ModelInfo> {
        self.registry.list_models()
    }

    /// Returns true if the version is currently loaded
    pub fn is_version_loaded(&self, version: &str) -> bool {
        self.registry.is_version_loaded(version)
    }

    /// Version used when a request names none
    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Loads every cataloged model, returning the number loaded
    pub async fn load_all(&self) -> usize {
        self.registry.load_all().await
    }

    /// Serving health: healthy exactly when the default model is loaded
    pub fn health(&self) -> HealthReport {
        let default_model_loaded = self.registry.is_version_loaded(&self.default_version);

        HealthReport {
            healthy: default_model_loaded,
            default_version: self.default_version.clone(),
            default_model_loaded,
            loaded_models: self.registry.loaded_count(),
        }
    }

    /// Gets the model registry
    pub fn get_registry(&self) -> Arc<ModelRegistry> {
        self.registry.clone()
    }

    /// Gets the configuration manager
    pub fn get_config_manager(&self) -> Arc<ConfigManager> {
        self.config_manager.clone()
    }
}
