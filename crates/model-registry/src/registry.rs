//! Model registry implementation
//!
//! The registry owns the process-wide cache of model services. Loading is
//! lazy and happens at most once per version: concurrent first requests are
//! serialized on a loading mutex, and a failed load leaves the cache
//! untouched so a later request can retry.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use common::models::ModelInfo;
use common::{Error, Result};
use model_service::ModelService;

use crate::catalog::{artifact_file, known_versions, AVAILABLE_MODELS};

/// Registry of model services keyed by catalog version
pub struct ModelRegistry {
    /// Loaded services (version -> service)
    services: DashMap<String, Arc<ModelService>>,

    /// Directory artifact files are resolved under
    models_dir: PathBuf,

    /// Loading mutex to prevent concurrent loads of the same version
    loading_mutex: Mutex<()>,

    /// Number of artifact load attempts that ran to completion
    load_attempts: AtomicU64,
}

impl ModelRegistry {
    /// Creates a registry resolving artifacts under `models_dir`
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            services: DashMap::new(),
            models_dir: models_dir.into(),
            loading_mutex: Mutex::new(()),
            load_attempts: AtomicU64::new(0),
        }
    }

    /// Directory artifact files are resolved under
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    fn artifact_path(&self, version: &str) -> Result<PathBuf> {
        let file = artifact_file(version).ok_or_else(|| Error::UnknownModelVersion {
            requested: version.to_string(),
            known: known_versions(),
        })?;

        Ok(self.models_dir.join(file))
    }

    /// Gets the service for a version, loading it on first use.
    ///
    /// A cached version is returned as-is; the artifact is never re-read.
    /// On a miss the load runs under the loading mutex, so two concurrent
    /// first requests produce one load and share the resulting service.
    pub async fn get_model(&self, version: &str) -> Result<Arc<ModelService>> {
        // Check if the version is already loaded
        if let Some(service) = self.services.get(version) {
            return Ok(service.clone());
        }

        let path = self.artifact_path(version)?;

        // Acquire loading mutex to prevent concurrent loads of the same version
        let _lock = self.loading_mutex.lock();

        // Check again after acquiring lock
        if let Some(service) = self.services.get(version) {
            return Ok(service.clone());
        }

        let mut service = ModelService::new(version, path);
        let outcome = service.load();
        self.load_attempts.fetch_add(1, Ordering::SeqCst);
        outcome?;

        let service = Arc::new(service);
        self.services.insert(version.to_string(), service.clone());

        Ok(service)
    }

    /// Loads every cataloged model, best effort. A version that fails to
    /// load is logged and skipped. Returns the number of loaded services.
    pub async fn load_all(&self) -> usize {
        info!(
            "Loading all cataloged models from {}",
            self.models_dir.display()
        );

        let mut loaded = 0;

        for (version, _) in AVAILABLE_MODELS {
            match self.get_model(version).await {
                Ok(_) => loaded += 1,
                Err(e) => warn!("Failed to load model {}: {}", version, e),
            }
        }

        info!(
            "Loaded {} of {} cataloged models",
            loaded,
            AVAILABLE_MODELS.len()
        );

        loaded
    }

    /// Snapshot of every cataloged version's status. Never triggers a load.
    pub fn list_models(&self) -> Vec<ModelInfo> {
        AVAILABLE_MODELS
            .iter()
            .map(|(version, file)| {
                let service = self.services.get(*version);

                ModelInfo {
                    version: version.to_string(),
                    file: file.to_string(),
                    path: self.models_dir.join(file),
                    loaded: service.is_some(),
                    algorithm: service
                        .as_ref()
                        .and_then(|s| s.algorithm())
                        .map(String::from),
                    loaded_at: service.as_ref().and_then(|s| s.loaded_at()),
                }
            })
            .collect()
    }

    /// Returns true if the version is currently loaded
    pub fn is_version_loaded(&self, version: &str) -> bool {
        self.services.contains_key(version)
    }

    /// Number of currently loaded services
    pub fn loaded_count(&self) -> usize {
        self.services.len()
    }

    /// Number of artifact load attempts that ran to completion
    pub fn load_attempt_count(&self) -> u64 {
        self.load_attempts.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_MODEL_VERSION;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn scaler_json() -> serde_json::Value {
        json!([
            {"feature": "Tenure Months", "mean": 32.0, "std": 24.0, "fill": 0.0},
            {"feature": "Monthly Charges", "mean": 64.0, "std": 30.0, "fill": 0.0},
            {"feature": "Total Charges", "mean": 2280.0, "std": 2266.0, "fill": 2280.0},
            {"feature": "CLTV", "mean": 4400.0, "std": 1100.0, "fill": 4400.0}
        ])
    }

    fn artifact_json(algorithm: &str) -> serde_json::Value {
        let model = match algorithm {
            "logistic_regression" => json!({
                "algorithm": "logistic_regression",
                "weights": vec![0.0; 41],
                "intercept": -0.3
            }),
            "random_forest" => json!({
                "algorithm": "random_forest",
                "trees": [{"root": {"value": 0.7}}]
            }),
            "gradient_boosting" => json!({
                "algorithm": "gradient_boosting",
                "base_score": 0.4,
                "trees": [{"root": {"value": 0.3}}]
            }),
            other => panic!("no fixture for algorithm {other}"),
        };

        json!({
            "schema": feature_schema::feature_names(),
            "scaler": scaler_json(),
            "model": model
        })
    }

    fn write_artifact(dir: &TempDir, file: &str, algorithm: &str) {
        fs::write(
            dir.path().join(file),
            serde_json::to_string(&artifact_json(algorithm)).unwrap(),
        )
        .unwrap();
    }

    fn registry_with_lr() -> (TempDir, ModelRegistry) {
        let dir = TempDir::new().unwrap();
        write_artifact(&dir, "churn_model_v1_lr.json", "logistic_regression");
        let registry = ModelRegistry::new(dir.path());
        (dir, registry)
    }

    #[tokio::test]
    async fn test_unknown_version_lists_the_catalog() {
        let (_dir, registry) = registry_with_lr();

        let err = registry.get_model("v9_unknown").await.err().unwrap();

        match err {
            Error::UnknownModelVersion { requested, known } => {
                assert_eq!(requested, "v9_unknown");
                assert_eq!(known, vec!["v1_lr", "v2_rf", "v3_gb"]);
            }
            other => panic!("expected UnknownModelVersion, got {other}"),
        }

        assert_eq!(registry.load_attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_get_model_loads_once_and_caches() {
        let (_dir, registry) = registry_with_lr();

        let first = registry.get_model("v1_lr").await.unwrap();
        let second = registry.get_model("v1_lr").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.load_attempt_count(), 1);
        assert!(registry.is_version_loaded("v1_lr"));
        assert_eq!(registry.loaded_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_first_requests_share_one_load() {
        let (_dir, registry) = registry_with_lr();
        let registry = Arc::new(registry);

        let a = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.get_model("v1_lr").await })
        };
        let b = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.get_model("v1_lr").await })
        };

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.load_attempt_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached_and_can_be_retried() {
        let dir = TempDir::new().unwrap();
        let registry = ModelRegistry::new(dir.path());

        let err = registry.get_model("v1_lr").await.err().unwrap();
        assert!(err.is_model_not_found());
        assert!(!registry.is_version_loaded("v1_lr"));
        assert_eq!(registry.load_attempt_count(), 1);

        write_artifact(&dir, "churn_model_v1_lr.json", "logistic_regression");

        let service = registry.get_model("v1_lr").await.unwrap();
        assert!(service.is_loaded());
        assert_eq!(registry.load_attempt_count(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_artifact_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("churn_model_v1_lr.json"), "{ nope").unwrap();
        let registry = ModelRegistry::new(dir.path());

        let err = registry.get_model("v1_lr").await.err().unwrap();
        assert!(err.is_model_load());
        assert!(!registry.is_version_loaded("v1_lr"));
    }

    #[tokio::test]
    async fn test_load_all_is_best_effort() {
        let dir = TempDir::new().unwrap();
        write_artifact(&dir, "churn_model_v1_lr.json", "logistic_regression");
        write_artifact(&dir, "churn_model_v3_gb.json", "gradient_boosting");
        let registry = ModelRegistry::new(dir.path());

        let loaded = registry.load_all().await;

        assert_eq!(loaded, 2);
        assert!(registry.is_version_loaded("v1_lr"));
        assert!(!registry.is_version_loaded("v2_rf"));
        assert!(registry.is_version_loaded("v3_gb"));
    }

    #[tokio::test]
    async fn test_list_models_reports_without_loading() {
        let (dir, registry) = registry_with_lr();

        let before = registry.list_models();
        assert_eq!(before.len(), 3);
        assert!(before.iter().all(|info| !info.loaded));
        assert!(before.iter().all(|info| info.algorithm.is_none()));
        assert_eq!(registry.load_attempt_count(), 0);

        write_artifact(&dir, "churn_model_v2_rf.json", "random_forest");
        registry.get_model("v2_rf").await.unwrap();

        let after = registry.list_models();
        let v2 = after.iter().find(|info| info.version == "v2_rf").unwrap();
        assert!(v2.loaded);
        assert_eq!(v2.algorithm.as_deref(), Some("random_forest"));
        assert!(v2.loaded_at.is_some());
        assert_eq!(v2.file, "churn_model_v2_rf.json");
        assert_eq!(v2.path, dir.path().join("churn_model_v2_rf.json"));
    }

    #[tokio::test]
    async fn test_default_version_resolves() {
        let (_dir, registry) = registry_with_lr();

        let service = registry.get_model(DEFAULT_MODEL_VERSION).await.unwrap();
        assert_eq!(service.version(), "v1_lr");
    }
}
