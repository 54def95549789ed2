//! Classifier capability interface
//!
//! The serving layer talks to loaded models exclusively through this trait,
//! so model families stay swappable behind `Arc<dyn Classifier>`.

use common::models::DECISION_THRESHOLD;
use common::Result;
use feature_schema::FeatureFrame;

/// A loaded churn model ready to score feature frames
pub trait Classifier: Send + Sync {
    /// Model family name, for status reporting
    fn algorithm(&self) -> &'static str;

    /// Churn-class probability for each row, in row order
    fn predict_probability(&self, frame: &FeatureFrame) -> Result<Vec<f64>>;

    /// Predicted class for each row (1 = churn, 0 = no churn)
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<u8>> {
        let probabilities = self.predict_probability(frame)?;

        Ok(probabilities
            .into_iter()
            .map(|probability| u8::from(probability >= DECISION_THRESHOLD))
            .collect())
    }
}
