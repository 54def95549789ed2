//! Model service implementation
//!
//! One service owns one catalog version: the artifact path it resolves to,
//! the classifier once loading succeeds, and the prediction entry points.
//! Batches fail or succeed as a whole, and page selection happens before the
//! classifier sees a single row.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use classifier::{Classifier, ModelArtifact};
use common::models::{BatchPrediction, Prediction};
use common::{Error, Result};
use feature_schema::{CustomerRecord, FeatureFrame};

use crate::pagination::PageRequest;

/// Serves predictions for one catalog model version
pub struct ModelService {
    /// Catalog version key
    version: String,

    /// Artifact path backing the version
    path: PathBuf,

    /// Loaded classifier, populated by `load`
    classifier: Option<Arc<dyn Classifier>>,

    /// Load timestamp
    loaded_at: Option<DateTime<Utc>>,
}

impl ModelService {
    /// Creates an unloaded service for a version and its artifact path
    pub fn new(version: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            version: version.into(),
            path: path.into(),
            classifier: None,
            loaded_at: None,
        }
    }

    /// Catalog version key the service answers for
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Artifact path the service loads from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once the model is in memory
    pub fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// Model family of the loaded artifact
    pub fn algorithm(&self) -> Option<&'static str> {
        self.classifier.as_ref().map(|c| c.algorithm())
    }

    /// Load timestamp, set when `load` first succeeds
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Loads the artifact into memory. Idempotent once loaded; a failed load
    /// leaves the service unloaded so a later call can retry.
    pub fn load(&mut self) -> Result<()> {
        if self.classifier.is_some() {
            debug!("Model {} is already loaded", self.version);
            return Ok(());
        }

        info!(
            "Loading model {} from {}",
            self.version,
            self.path.display()
        );

        let artifact = ModelArtifact::load(&self.path)?;
        let classifier = artifact.into_classifier()?;

        self.classifier = Some(classifier);
        self.loaded_at = Some(Utc::now());

        info!("Model {} loaded successfully", self.version);

        Ok(())
    }

    fn classifier(&self) -> Result<&Arc<dyn Classifier>> {
        self.classifier
            .as_ref()
            .ok_or_else(|| Error::NotLoaded(self.version.clone()))
    }

    /// Scores a single customer record
    pub fn predict_single(&self, record: &CustomerRecord) -> Result<Prediction> {
        let batch = self.predict_batch(std::slice::from_ref(record), None)?;

        batch.predictions.into_iter().next().ok_or_else(|| {
            Error::Inference("classifier produced no prediction for the record".to_string())
        })
    }

    /// Scores a batch of customer records, optionally restricted to one page.
    ///
    /// The full batch is validated and counted first; the page is then cut
    /// from the validated rows and only those rows reach the classifier.
    /// `total_count` always reflects the full request.
    pub fn predict_batch(
        &self,
        records: &[CustomerRecord],
        page: Option<PageRequest>,
    ) -> Result<BatchPrediction> {
        let classifier = self.classifier()?;

        let frame = FeatureFrame::from_records(records)?;
        let total_count = frame.len();

        let selected = match page {
            Some(page) => frame.slice(page.offset(), page.page_size()),
            None => frame,
        };

        debug!(
            "Predicting with model {}: {} of {} records selected",
            self.version,
            selected.len(),
            total_count
        );

        let classes = classifier.predict(&selected).map_err(narrow_to_inference)?;
        let probabilities = classifier
            .predict_probability(&selected)
            .map_err(narrow_to_inference)?;

        if classes.len() != selected.len() || probabilities.len() != selected.len() {
            return Err(Error::Inference(format!(
                "classifier produced {} classes and {} probabilities for {} rows",
                classes.len(),
                probabilities.len(),
                selected.len()
            )));
        }

        let predictions = classes
            .into_iter()
            .zip(probabilities)
            .map(|(class, probability)| Prediction::new(class, probability))
            .collect();

        Ok(BatchPrediction {
            predictions,
            total_count,
        })
    }
}

/// Classifier failures surface to callers as inference errors, whatever
/// internal kind the classifier reported
fn narrow_to_inference(err: Error) -> Error {
    match err {
        Error::Inference(_) => err,
        other => Error::Inference(other.to_string()),
    }
}
