//! Configuration management for the churn serving system
//!
//! This crate provides the layered configuration manager the serving facade
//! is wired with: built-in defaults, an optional JSON configuration file, and
//! environment variable overrides.

pub mod manager;

// Re-export commonly used types
pub use manager::{ConfigManager, CONFIG_PATH_ENV, ENV_PREFIX};
