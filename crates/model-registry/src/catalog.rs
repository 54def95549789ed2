//! Model catalog
//!
//! The catalog is the fixed map of servable model versions to the artifact
//! files backing them. Versions outside the catalog are never resolvable, no
//! matter what files exist on disk.

/// Version key used when a request names no version
pub const DEFAULT_MODEL_VERSION: &str = "v1_lr";

/// Servable versions and their artifact files, in release order
pub const AVAILABLE_MODELS: &[(&str, &str)] = &[
    ("v1_lr", "churn_model_v1_lr.json"),
    ("v2_rf", "churn_model_v2_rf.json"),
    ("v3_gb", "churn_model_v3_gb.json"),
];

/// Gets the artifact file backing a version, if the catalog knows it
pub fn artifact_file(version: &str) -> Option<&'static str> {
    AVAILABLE_MODELS
        .iter()
        .find(|(key, _)| *key == version)
        .map(|(_, file)| *file)
}

/// Version keys the catalog recognizes, in release order
pub fn known_versions() -> Vec<String> {
    AVAILABLE_MODELS
        .iter()
        .map(|(key, _)| key.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_version_is_cataloged() {
        assert!(artifact_file(DEFAULT_MODEL_VERSION).is_some());
    }

    #[test]
    fn test_artifact_file_lookup() {
        assert_eq!(artifact_file("v1_lr"), Some("churn_model_v1_lr.json"));
        assert_eq!(artifact_file("v2_rf"), Some("churn_model_v2_rf.json"));
        assert_eq!(artifact_file("v3_gb"), Some("churn_model_v3_gb.json"));
        assert_eq!(artifact_file("v9_unknown"), None);
    }

    #[test]
    fn test_known_versions_follow_release_order() {
        assert_eq!(known_versions(), vec!["v1_lr", "v2_rf", "v3_gb"]);
    }

    #[test]
    fn test_artifact_files_are_distinct() {
        for (index, (_, file)) in AVAILABLE_MODELS.iter().enumerate() {
            for (_, other) in &AVAILABLE_MODELS[index + 1..] {
                assert_ne!(file, other);
            }
        }
    }
}
