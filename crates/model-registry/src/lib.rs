//! Model registry for the churn serving system
//!
//! This crate owns the catalog of servable model versions and the
//! process-wide registry that loads each version at most once and hands out
//! shared service handles.

pub mod catalog;
pub mod registry;

// Re-export commonly used types
pub use catalog::{artifact_file, known_versions, AVAILABLE_MODELS, DEFAULT_MODEL_VERSION};
pub use registry::ModelRegistry;
