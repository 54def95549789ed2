//! Validated feature frame
//!
//! This module turns customer records into schema-ordered rows. Validation is
//! per record: a mandatory slot that is absent or explicitly null in any
//! record fails the whole request, so a batch never partially succeeds.

use std::collections::BTreeSet;
use tracing::debug;

use common::{Error, Result};

use crate::record::{CustomerRecord, FeatureValue};
use crate::slots::{FEATURE_COUNT, FEATURE_SLOTS};

/// Schema-ordered feature rows ready for inference
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    rows: Vec<Vec<FeatureValue>>,
}

impl FeatureFrame {
    /// Builds a frame from customer records.
    ///
    /// Every row holds exactly the schema's slots in training order. Features
    /// outside the schema are dropped. Missing or null values are kept as
    /// nulls for the missing-tolerant slots and collected into a single
    /// `SchemaViolation` for the mandatory ones.
    pub fn from_records(records: &[CustomerRecord]) -> Result<Self> {
        let mut missing: BTreeSet<&'static str> = BTreeSet::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let mut row = Vec::with_capacity(FEATURE_COUNT);

            for slot in &FEATURE_SLOTS {
                match record.get(slot.name) {
                    Some(value) if !value.is_null() => row.push(value.clone()),
                    _ => {
                        if slot.required {
                            missing.insert(slot.name);
                        }
                        row.push(FeatureValue::Null);
                    }
                }
            }

            rows.push(row);
        }

        if !missing.is_empty() {
            return Err(Error::SchemaViolation {
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        debug!("Built feature frame with {} rows", rows.len());

        Ok(Self { rows })
    }

    /// Number of rows in the frame
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of slots in every row
    pub fn width(&self) -> usize {
        FEATURE_COUNT
    }

    /// The rows in input order
    pub fn rows(&self) -> &[Vec<FeatureValue>] {
        &self.rows
    }

    /// Gets a single row
    pub fn row(&self, index: usize) -> Option<&[FeatureValue]> {
        self.rows.get(index).map(|row| row.as_slice())
    }

    /// Extracts the row range `[offset, offset + limit)`, clamped to the
    /// frame. A range entirely beyond the frame yields an empty frame.
    pub fn slice(&self, offset: usize, limit: usize) -> Self {
        let start = offset.min(self.rows.len());
        let end = offset.saturating_add(limit).min(self.rows.len());

        Self {
            rows: self.rows[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CustomerRecord {
        let mut record = CustomerRecord::new();
        record.set("Gender", "Male");
        record.set("Senior Citizen", "No");
        record.set("Partner", "No");
        record.set("Dependents", "Yes");
        record.set("Phone Service", "Yes");
        record.set("Multiple Lines", "Yes");
        record.set("Internet Service", "DSL");
        record.set("Online Security", "Yes");
        record.set("Online Backup", "No");
        record.set("Device Protection", "Yes");
        record.set("Tech Support", "Yes");
        record.set("Streaming TV", "No");
        record.set("Streaming Movies", "No");
        record.set("Contract", "Two year");
        record.set("Paperless Billing", "No");
        record.set("Payment Method", "Mailed check");
        record.set("Tenure Months", 60);
        record.set("Monthly Charges", 56.15);
        record.set("Total Charges", 3487.95);
        record.set("CLTV", 5306.0);
        record
    }

    #[test]
    fn test_rows_follow_training_order() {
        let frame = FeatureFrame::from_records(&[sample_record()]).unwrap();
        let row = frame.row(0).unwrap();

        assert_eq!(row.len(), FEATURE_COUNT);
        assert_eq!(row[0], FeatureValue::Text("Male".to_string()));
        assert_eq!(row[13], FeatureValue::Text("Two year".to_string()));
        assert_eq!(row[16], FeatureValue::Number(60.0));
        assert_eq!(row[19], FeatureValue::Number(5306.0));
    }

    #[test]
    fn test_features_outside_schema_are_dropped() {
        let mut record = sample_record();
        record.set("Customer ID", "9237-HQITU");
        record.set("Churn Score", 91);

        let frame = FeatureFrame::from_records(&[record]).unwrap();
        assert_eq!(frame.row(0).unwrap().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_missing_total_charges_becomes_null() {
        let mut record = sample_record();
        record.remove("Total Charges");

        let frame = FeatureFrame::from_records(&[record]).unwrap();
        assert_eq!(frame.row(0).unwrap()[18], FeatureValue::Null);
    }

    #[test]
    fn test_missing_mandatory_feature_fails_the_batch() {
        let mut second = sample_record();
        second.remove("Tenure Months");

        let err =
            FeatureFrame::from_records(&[sample_record(), second, sample_record()]).unwrap_err();

        match err {
            Error::SchemaViolation { missing } => {
                assert_eq!(missing, vec!["Tenure Months".to_string()]);
            }
            other => panic!("expected SchemaViolation, got {other}"),
        }
    }

    #[test]
    fn test_explicit_null_on_mandatory_feature_fails() {
        let mut record = sample_record();
        record.set("Monthly Charges", FeatureValue::Null);

        let err = FeatureFrame::from_records(&[record]).unwrap_err();
        assert!(err.is_schema_violation());
    }

    #[test]
    fn test_missing_names_are_sorted_and_deduplicated() {
        let mut first = sample_record();
        first.remove("Tenure Months");
        let mut second = sample_record();
        second.remove("Gender");
        second.remove("Tenure Months");

        let err = FeatureFrame::from_records(&[first, second]).unwrap_err();

        match err {
            Error::SchemaViolation { missing } => {
                assert_eq!(
                    missing,
                    vec!["Gender".to_string(), "Tenure Months".to_string()]
                );
            }
            other => panic!("expected SchemaViolation, got {other}"),
        }
    }

    #[test]
    fn test_empty_input_builds_empty_frame() {
        let frame = FeatureFrame::from_records(&[]).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
    }

    #[test]
    fn test_slice_clamps_to_frame() {
        let records = vec![sample_record(), sample_record(), sample_record()];
        let frame = FeatureFrame::from_records(&records).unwrap();

        assert_eq!(frame.slice(0, 2).len(), 2);
        assert_eq!(frame.slice(2, 2).len(), 1);
        assert_eq!(frame.slice(3, 2).len(), 0);
        assert_eq!(frame.slice(10, 5).len(), 0);
    }
}
