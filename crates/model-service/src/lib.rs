//! Prediction service for the churn serving system
//!
//! This crate provides the per-version model service: loading a catalog
//! version's artifact once, then serving single and batch predictions, with
//! page selection applied before any inference work.

pub mod pagination;
pub mod service;

// Re-export commonly used types
pub use pagination::{PageRequest, MAX_PAGE_SIZE};
pub use service::ModelService;
