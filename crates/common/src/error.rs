//! Error types for the common crate
//!
//! This module defines the common error types used throughout the churn serving system.

use thiserror::Error;

/// Result type for churn serving operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for churn serving operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested model version is not in the catalog
    #[error("Unknown model version '{requested}' (available: {})", .known.join(", "))]
    UnknownModelVersion {
        /// Version key that was requested
        requested: String,
        /// Version keys the catalog recognizes
        known: Vec<String>,
    },

    /// Model artifact file does not exist on disk
    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    /// Model artifact exists but could not be read or verified
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Inference was requested on a service whose model never loaded
    #[error("Model not loaded: {0}")]
    NotLoaded(String),

    /// Input records are missing mandatory features
    #[error("Schema violation: missing required features: {}", .missing.join(", "))]
    SchemaViolation {
        /// Sorted, de-duplicated names of the absent mandatory features
        missing: Vec<String>,
    },

    /// Inference error
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns true if the error is an unknown model version error
    pub fn is_unknown_version(&self) -> bool {
        matches!(self, Error::UnknownModelVersion { .. })
    }

    /// Returns true if the error is a model not found error
    pub fn is_model_not_found(&self) -> bool {
        matches!(self, Error::ModelNotFound(_))
    }

    /// Returns true if the error is a model load error
    pub fn is_model_load(&self) -> bool {
        matches!(self, Error::ModelLoad(_))
    }

    /// Returns true if the error is a schema violation
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Error::SchemaViolation { .. })
    }

    /// Returns true if the error is an inference error
    pub fn is_inference(&self) -> bool {
        matches!(self, Error::Inference(_))
    }

    /// Returns true if the error is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Returns true if a later retry of the same operation could succeed,
    /// for example after the missing artifact file appears on disk
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ModelNotFound(_) | Error::ModelLoad(_) | Error::Io(_)
        )
    }
}
