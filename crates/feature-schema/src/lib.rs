//! Feature schema for the churn serving system
//!
//! This crate defines the fixed feature layout churn models are trained
//! against, the record type callers submit, and the validation that turns
//! records into schema-ordered rows ready for inference.

pub mod frame;
pub mod record;
pub mod slots;

// Re-export commonly used types
pub use frame::FeatureFrame;
pub use record::{CustomerRecord, FeatureValue};
pub use slots::{feature_names, slot_index, FeatureKind, FeatureSlot, FEATURE_COUNT, FEATURE_SLOTS};
