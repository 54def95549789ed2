//! Churn model classifiers
//!
//! This crate provides the classifier capability interface the serving layer
//! depends on, the serialized artifact format trained models are shipped in,
//! and the three model families the catalog serves.

pub mod artifact;
pub mod encoder;
pub mod linear;
pub mod model;
pub mod trees;

// Re-export commonly used types
pub use artifact::{ModelArtifact, ModelParams, ScalerStats};
pub use encoder::RowEncoder;
pub use linear::LogisticRegressionModel;
pub use model::Classifier;
pub use trees::{DecisionTree, GradientBoostingModel, RandomForestModel, TreeNode};
