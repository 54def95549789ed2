//! Common types for the churn serving system
//!
//! This crate provides shared functionality used across the churn serving system,
//! including error types and the prediction result models.

pub mod error;
pub mod models;

// Re-export commonly used types
pub use error::{Error, Result};
pub use models::*;
