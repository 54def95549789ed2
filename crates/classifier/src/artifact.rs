//! Model artifact format
//!
//! Trained churn models ship as JSON documents carrying the feature layout
//! they were trained on, the scaler statistics for the numeric slots, and the
//! family-specific parameters. Loading verifies the recorded layout against
//! the serving schema before any inference can happen.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use common::{Error, Result};
use feature_schema::feature_names;

use crate::encoder::RowEncoder;
use crate::linear::LogisticRegressionModel;
use crate::model::Classifier;
use crate::trees::{DecisionTree, GradientBoostingModel, RandomForestModel};

/// Standard-scaler statistics for one numeric feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerStats {
    /// Feature the statistics belong to
    pub feature: String,
    /// Training mean
    pub mean: f64,
    /// Training standard deviation
    pub std: f64,
    /// Raw value imputed when the feature is missing
    pub fill: f64,
}

impl ScalerStats {
    /// Creates scaler statistics for a feature
    pub fn new(feature: impl Into<String>, mean: f64, std: f64, fill: f64) -> Self {
        Self {
            feature: feature.into(),
            mean,
            std,
            fill,
        }
    }
}

/// Family-specific model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum ModelParams {
    /// Weight vector and intercept over the encoded row
    LogisticRegression {
        /// One weight per encoded column
        weights: Vec<f64>,
        /// Intercept added to the weighted sum
        intercept: f64,
    },
    /// Trees whose leaves hold churn probabilities
    RandomForest {
        /// Ensemble members
        trees: Vec<DecisionTree>,
    },
    /// Trees whose leaves hold margins added to a base score
    GradientBoosting {
        /// Margin before any tree contributes
        base_score: f64,
        /// Ensemble members
        trees: Vec<DecisionTree>,
    },
}

/// A serialized churn model as produced by the training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Feature names in the order the model was trained on
    pub schema: Vec<String>,
    /// Scaler statistics for the numeric features
    pub scaler: Vec<ScalerStats>,
    /// Family-specific parameters
    pub model: ModelParams,
}

impl ModelArtifact {
    /// Reads and verifies an artifact from disk.
    ///
    /// A path that does not exist maps to `ModelNotFound`; everything wrong
    /// past that point (unreadable file, malformed JSON, a feature layout
    /// that diverges from the serving schema) maps to `ModelLoad`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::ModelLoad(format!("failed to read {}: {}", path.display(), e))
        })?;

        let artifact: ModelArtifact = serde_json::from_str(&contents).map_err(|e| {
            Error::ModelLoad(format!("failed to parse {}: {}", path.display(), e))
        })?;

        artifact.verify_layout()?;

        debug!(
            "Loaded {} artifact from {}",
            artifact.algorithm(),
            path.display()
        );

        Ok(artifact)
    }

    /// Checks that the recorded feature layout matches the serving schema,
    /// name for name and position for position
    pub fn verify_layout(&self) -> Result<()> {
        let expected = feature_names();

        if self.schema.len() != expected.len() {
            return Err(Error::ModelLoad(format!(
                "artifact lists {} features, serving schema has {}",
                self.schema.len(),
                expected.len()
            )));
        }

        for (position, (recorded, served)) in self.schema.iter().zip(&expected).enumerate() {
            if recorded != served {
                return Err(Error::ModelLoad(format!(
                    "artifact feature {} is '{}', serving schema expects '{}'",
                    position, recorded, served
                )));
            }
        }

        Ok(())
    }

    /// Model family name
    pub fn algorithm(&self) -> &'static str {
        match &self.model {
            ModelParams::LogisticRegression { .. } => "logistic_regression",
            ModelParams::RandomForest { .. } => "random_forest",
            ModelParams::GradientBoosting { .. } => "gradient_boosting",
        }
    }

    /// Builds the runnable classifier for the artifact's family.
    ///
    /// Consumes the artifact; parameter problems the format itself cannot
    /// express (weight arity, tree column references, scaler coverage)
    /// surface here as `ModelLoad`.
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>> {
        let encoder = RowEncoder::new(&self.scaler)?;

        match self.model {
            ModelParams::LogisticRegression { weights, intercept } => Ok(Arc::new(
                LogisticRegressionModel::new(encoder, weights, intercept)?,
            )),
            ModelParams::RandomForest { trees } => {
                Ok(Arc::new(RandomForestModel::new(encoder, trees)?))
            }
            ModelParams::GradientBoosting { base_score, trees } => Ok(Arc::new(
                GradientBoostingModel::new(encoder, base_score, trees)?,
            )),
        }
    }
}
