//! Logistic regression family
//!
//! Scores encoded rows with a weight vector and intercept through the
//! logistic function.

use common::{Error, Result};
use feature_schema::FeatureFrame;

use crate::encoder::RowEncoder;
use crate::model::Classifier;

/// Standard logistic function
pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Logistic regression churn model
pub struct LogisticRegressionModel {
    encoder: RowEncoder,
    weights: Vec<f64>,
    intercept: f64,
}

impl LogisticRegressionModel {
    /// Creates the model, checking the weight vector against the encoded width
    pub fn new(encoder: RowEncoder, weights: Vec<f64>, intercept: f64) -> Result<Self> {
        if weights.len() != encoder.width() {
            return Err(Error::ModelLoad(format!(
                "weight vector has {} entries, encoded rows have {}",
                weights.len(),
                encoder.width()
            )));
        }

        Ok(Self {
            encoder,
            weights,
            intercept,
        })
    }

    fn score_row(&self, encoded: &[f64]) -> f64 {
        let margin: f64 = self
            .weights
            .iter()
            .zip(encoded)
            .map(|(weight, value)| weight * value)
            .sum();

        sigmoid(margin + self.intercept)
    }
}

impl Classifier for LogisticRegressionModel {
    fn algorithm(&self) -> &'static str {
        "logistic_regression"
    }

    fn predict_probability(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        frame
            .rows()
            .iter()
            .map(|row| Ok(self.score_row(&self.encoder.encode_row(row)?)))
            .collect()
    }
}
