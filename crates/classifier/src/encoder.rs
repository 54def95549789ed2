//! Row encoder
//!
//! This module turns validated feature rows into the numeric vectors the
//! model families score: one-hot columns for each categorical slot's closed
//! domain, followed in slot order by standard-scaled numeric columns.

use std::collections::HashMap;

use common::{Error, Result};
use feature_schema::{FeatureFrame, FeatureKind, FeatureValue, FEATURE_SLOTS};

use crate::artifact::ScalerStats;

enum Segment {
    OneHot(&'static [&'static str]),
    Scaled(ScalerStats),
}

/// Encodes schema-ordered rows into the numeric layout a model was trained on
pub struct RowEncoder {
    segments: Vec<Segment>,
    width: usize,
}

impl RowEncoder {
    /// Builds an encoder from an artifact's scaler statistics.
    ///
    /// The statistics must cover exactly the schema's numeric slots, and every
    /// standard deviation must be positive.
    pub fn new(scalers: &[ScalerStats]) -> Result<Self> {
        let mut by_name: HashMap<&str, &ScalerStats> = HashMap::new();
        for stats in scalers {
            if by_name.insert(stats.feature.as_str(), stats).is_some() {
                return Err(Error::ModelLoad(format!(
                    "duplicate scaler statistics for '{}'",
                    stats.feature
                )));
            }
        }

        let mut segments = Vec::with_capacity(FEATURE_SLOTS.len());
        let mut width = 0;

        for slot in &FEATURE_SLOTS {
            match slot.kind {
                FeatureKind::Categorical(domain) => {
                    width += domain.len();
                    segments.push(Segment::OneHot(domain));
                }
                FeatureKind::Count | FeatureKind::Continuous => {
                    let stats = by_name.remove(slot.name).ok_or_else(|| {
                        Error::ModelLoad(format!("missing scaler statistics for '{}'", slot.name))
                    })?;
                    if stats.std <= 0.0 {
                        return Err(Error::ModelLoad(format!(
                            "scaler std for '{}' must be positive, got {}",
                            slot.name, stats.std
                        )));
                    }
                    width += 1;
                    segments.push(Segment::Scaled(stats.clone()));
                }
            }
        }

        if let Some(extra) = by_name.keys().next() {
            return Err(Error::ModelLoad(format!(
                "scaler statistics for '{extra}' do not match any numeric feature"
            )));
        }

        Ok(Self { segments, width })
    }

    /// Number of columns an encoded row has
    pub fn width(&self) -> usize {
        self.width
    }

    /// Encodes one schema-ordered row
    pub fn encode_row(&self, row: &[FeatureValue]) -> Result<Vec<f64>> {
        if row.len() != self.segments.len() {
            return Err(Error::Inference(format!(
                "row has {} slots, expected {}",
                row.len(),
                self.segments.len()
            )));
        }

        let mut encoded = Vec::with_capacity(self.width);

        for ((slot, segment), value) in FEATURE_SLOTS.iter().zip(&self.segments).zip(row) {
            match segment {
                Segment::OneHot(domain) => {
                    let text = value.as_str().ok_or_else(|| {
                        Error::Inference(format!(
                            "feature '{}' expects a categorical value",
                            slot.name
                        ))
                    })?;
                    let position = domain.iter().position(|c| *c == text).ok_or_else(|| {
                        Error::Inference(format!(
                            "feature '{}' has value '{}' outside the trained domain",
                            slot.name, text
                        ))
                    })?;
                    for index in 0..domain.len() {
                        encoded.push(if index == position { 1.0 } else { 0.0 });
                    }
                }
                Segment::Scaled(stats) => {
                    let raw = match value {
                        FeatureValue::Null => stats.fill,
                        FeatureValue::Number(number) => *number,
                        FeatureValue::Text(text) => {
                            return Err(Error::Inference(format!(
                                "feature '{}' expects a numeric value, got '{}'",
                                slot.name, text
                            )))
                        }
                    };
                    encoded.push((raw - stats.mean) / stats.std);
                }
            }
        }

        Ok(encoded)
    }

    /// Encodes every row of a frame, in row order
    pub fn encode_frame(&self, frame: &FeatureFrame) -> Result<Vec<Vec<f64>>> {
        frame.rows().iter().map(|row| self.encode_row(row)).collect()
    }
}
