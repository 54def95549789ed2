//! Feature slot catalog
//!
//! This module defines the twenty feature slots every served churn model was
//! trained against. The slot order here is the training order; encoded rows
//! feed models positionally, so the order must never change.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Number of feature slots every record resolves to
pub const FEATURE_COUNT: usize = 20;

/// Domain shared by the binary Yes/No slots
pub const YES_NO: &[&str] = &["Yes", "No"];

/// Kind of value a feature slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Categorical value restricted to a closed string domain
    Categorical(&'static [&'static str]),
    /// Non-negative integer count
    Count,
    /// Non-negative continuous value
    Continuous,
}

/// A single named feature slot
#[derive(Debug, Clone, Copy)]
pub struct FeatureSlot {
    /// Feature name, exactly as the training pipeline produced it
    pub name: &'static str,
    /// Kind of value the slot holds
    pub kind: FeatureKind,
    /// Whether every record must carry a value for this slot
    pub required: bool,
}

impl FeatureSlot {
    const fn categorical(name: &'static str, domain: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: FeatureKind::Categorical(domain),
            required: true,
        }
    }

    const fn yes_no(name: &'static str) -> Self {
        Self::categorical(name, YES_NO)
    }
}

/// Feature slots in training order
pub const FEATURE_SLOTS: [FeatureSlot; FEATURE_COUNT] = [
    FeatureSlot::categorical("Gender", &["Male", "Female"]),
    FeatureSlot::yes_no("Senior Citizen"),
    FeatureSlot::yes_no("Partner"),
    FeatureSlot::yes_no("Dependents"),
    FeatureSlot::yes_no("Phone Service"),
    FeatureSlot::categorical("Multiple Lines", &["Yes", "No", "No phone service"]),
    FeatureSlot::categorical("Internet Service", &["DSL", "Fiber optic", "No"]),
    FeatureSlot::yes_no("Online Security"),
    FeatureSlot::yes_no("Online Backup"),
    FeatureSlot::yes_no("Device Protection"),
    FeatureSlot::yes_no("Tech Support"),
    FeatureSlot::yes_no("Streaming TV"),
    FeatureSlot::yes_no("Streaming Movies"),
    FeatureSlot::categorical("Contract", &["Month-to-month", "One year", "Two year"]),
    FeatureSlot::yes_no("Paperless Billing"),
    FeatureSlot::categorical(
        "Payment Method",
        &[
            "Bank transfer (automatic)",
            "Credit card (automatic)",
            "Electronic check",
            "Mailed check",
        ],
    ),
    FeatureSlot {
        name: "Tenure Months",
        kind: FeatureKind::Count,
        required: true,
    },
    FeatureSlot {
        name: "Monthly Charges",
        kind: FeatureKind::Continuous,
        required: true,
    },
    // The one slot the training data itself has gaps in
    FeatureSlot {
        name: "Total Charges",
        kind: FeatureKind::Continuous,
        required: false,
    },
    FeatureSlot {
        name: "CLTV",
        kind: FeatureKind::Continuous,
        required: true,
    },
];

static SLOT_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    FEATURE_SLOTS
        .iter()
        .enumerate()
        .map(|(index, slot)| (slot.name, index))
        .collect()
});

/// Gets the feature names in training order
pub fn feature_names() -> Vec<&'static str> {
    FEATURE_SLOTS.iter().map(|slot| slot.name).collect()
}

/// Gets the position of a feature in the training order
pub fn slot_index(name: &str) -> Option<usize> {
    SLOT_INDEX.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_follow_training_order() {
        let expected = vec![
            "Gender",
            "Senior Citizen",
            "Partner",
            "Dependents",
            "Phone Service",
            "Multiple Lines",
            "Internet Service",
            "Online Security",
            "Online Backup",
            "Device Protection",
            "Tech Support",
            "Streaming TV",
            "Streaming Movies",
            "Contract",
            "Paperless Billing",
            "Payment Method",
            "Tenure Months",
            "Monthly Charges",
            "Total Charges",
            "CLTV",
        ];

        assert_eq!(feature_names(), expected);
    }

    #[test]
    fn test_slot_index_matches_position() {
        assert_eq!(slot_index("Gender"), Some(0));
        assert_eq!(slot_index("Tenure Months"), Some(16));
        assert_eq!(slot_index("CLTV"), Some(19));
        assert_eq!(slot_index("Customer ID"), None);
    }

    #[test]
    fn test_only_total_charges_is_optional() {
        let optional: Vec<&str> = FEATURE_SLOTS
            .iter()
            .filter(|slot| !slot.required)
            .map(|slot| slot.name)
            .collect();

        assert_eq!(optional, vec!["Total Charges"]);
    }

    #[test]
    fn test_categorical_domains_are_closed() {
        for slot in &FEATURE_SLOTS {
            if let FeatureKind::Categorical(domain) = slot.kind {
                assert!(!domain.is_empty(), "empty domain for {}", slot.name);
            }
        }

        match FEATURE_SLOTS[15].kind {
            FeatureKind::Categorical(domain) => assert_eq!(domain.len(), 4),
            _ => panic!("Payment Method must be categorical"),
        }
    }
}
