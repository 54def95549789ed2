//! Common data models for the churn serving system
//!
//! This module defines the shared prediction and status models used throughout
//! the churn serving system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Probability threshold above which a customer is classified as churning
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Human-readable churn outcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChurnLabel {
    /// Customer is predicted to churn
    Yes,
    /// Customer is predicted to stay
    No,
}

impl ChurnLabel {
    /// Derives the label from the predicted class
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            ChurnLabel::Yes
        } else {
            ChurnLabel::No
        }
    }

    /// Returns the label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnLabel::Yes => "Yes",
            ChurnLabel::No => "No",
        }
    }
}

impl std::fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of scoring a single customer record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    /// Predicted class (1 = churn, 0 = no churn)
    pub churn_prediction: u8,
    /// Probability of the churn class
    pub churn_probability: f64,
    /// Label derived from the predicted class
    pub churn_label: ChurnLabel,
}

impl Prediction {
    /// Creates a prediction from a class and its churn probability
    pub fn new(class: u8, probability: f64) -> Self {
        Self {
            churn_prediction: class,
            churn_probability: probability,
            churn_label: ChurnLabel::from_class(class),
        }
    }
}

/// Outcome of scoring a batch of customer records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPrediction {
    /// Predictions for the selected records, in input order
    pub predictions: Vec<Prediction>,
    /// Number of records in the full request, before any pagination
    pub total_count: usize,
}

/// Catalog status of a single model version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Version key in the catalog
    pub version: String,
    /// Artifact file name backing this version
    pub file: String,
    /// Full path the artifact is resolved to
    pub path: PathBuf,
    /// Whether the model is currently loaded into memory
    pub loaded: bool,
    /// Model family of the loaded artifact
    pub algorithm: Option<String>,
    /// Load timestamp
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Snapshot of overall serving health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// True when the default model is ready to serve
    pub healthy: bool,
    /// Version key used when a request names no version
    pub default_version: String,
    /// Whether the default model is loaded
    pub default_model_loaded: bool,
    /// Number of currently loaded models
    pub loaded_models: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(ChurnLabel::from_class(1), ChurnLabel::Yes);
        assert_eq!(ChurnLabel::from_class(0), ChurnLabel::No);
        assert_eq!(ChurnLabel::Yes.as_str(), "Yes");
        assert_eq!(ChurnLabel::No.as_str(), "No");
    }

    #[test]
    fn test_prediction_derives_label_from_class() {
        let churn = Prediction::new(1, 0.83);
        assert_eq!(churn.churn_prediction, 1);
        assert_eq!(churn.churn_label, ChurnLabel::Yes);

        let stay = Prediction::new(0, 0.21);
        assert_eq!(stay.churn_prediction, 0);
        assert_eq!(stay.churn_label, ChurnLabel::No);
    }

    #[test]
    fn test_prediction_serializes_with_expected_fields() {
        let prediction = Prediction::new(1, 0.75);
        let json = serde_json::to_value(&prediction).unwrap();

        assert_eq!(json["churn_prediction"], 1);
        assert_eq!(json["churn_probability"], 0.75);
        assert_eq!(json["churn_label"], "Yes");
    }
}
