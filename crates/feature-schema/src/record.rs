//! Customer record input type
//!
//! This module provides the record type callers submit for scoring: a mapping
//! from feature name to value, with helpers for checking value-domain
//! legality at the request boundary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use common::{Error, Result};

use crate::slots::{FeatureKind, FEATURE_SLOTS};

/// A single feature value as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Explicitly absent value
    Null,
    /// Numeric value
    Number(f64),
    /// Categorical string value
    Text(String),
}

impl FeatureValue {
    /// Returns true if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FeatureValue::Null)
    }

    /// Returns the value as a number, if it is one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<i32> for FeatureValue {
    fn from(value: i32) -> Self {
        FeatureValue::Number(value as f64)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

/// One customer's feature values keyed by feature name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerRecord {
    values: HashMap<String, FeatureValue>,
}

impl CustomerRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a feature value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Removes a feature value
    pub fn remove(&mut self, name: &str) -> Option<FeatureValue> {
        self.values.remove(name)
    }

    /// Gets a feature value
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    /// Returns true if the record carries the feature
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of features the record carries, schema members or not
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record carries no features
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Checks every present value against its slot's domain.
    ///
    /// Categorical values must belong to the slot's closed domain, counts must
    /// be non-negative integers, and continuous values must be non-negative.
    /// Null values and features outside the schema are skipped; presence of
    /// mandatory slots is enforced separately when records become a frame.
    pub fn check_domains(&self) -> Result<()> {
        for slot in &FEATURE_SLOTS {
            let value = match self.values.get(slot.name) {
                Some(value) if !value.is_null() => value,
                _ => continue,
            };

            match slot.kind {
                FeatureKind::Categorical(domain) => {
                    let text = value.as_str().ok_or_else(|| {
                        Error::InvalidArgument(format!(
                            "feature '{}' expects one of [{}]",
                            slot.name,
                            domain.join(", ")
                        ))
                    })?;
                    if !domain.contains(&text) {
                        return Err(Error::InvalidArgument(format!(
                            "feature '{}' has value '{}' outside [{}]",
                            slot.name,
                            text,
                            domain.join(", ")
                        )));
                    }
                }
                FeatureKind::Count => {
                    let number = value.as_f64().ok_or_else(|| {
                        Error::InvalidArgument(format!(
                            "feature '{}' expects a non-negative integer",
                            slot.name
                        ))
                    })?;
                    if number < 0.0 || number.fract() != 0.0 {
                        return Err(Error::InvalidArgument(format!(
                            "feature '{}' expects a non-negative integer, got {}",
                            slot.name, number
                        )));
                    }
                }
                FeatureKind::Continuous => {
                    let number = value.as_f64().ok_or_else(|| {
                        Error::InvalidArgument(format!(
                            "feature '{}' expects a non-negative number",
                            slot.name
                        ))
                    })?;
                    if !number.is_finite() || number < 0.0 {
                        return Err(Error::InvalidArgument(format!(
                            "feature '{}' expects a finite non-negative number, got {}",
                            slot.name, number
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl From<HashMap<String, FeatureValue>> for CustomerRecord {
    fn from(values: HashMap<String, FeatureValue>) -> Self {
        Self { values }
    }
}
