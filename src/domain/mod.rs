//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! Mapping from raw form input is total and never fails.

mod diagnosis;
mod form;
mod patient;

pub use diagnosis::{
    Assessment, FeatureImportance, PredictionResult, RiskLevel, FALLBACK_LABEL, NO_DISEASE_LABEL,
    RISK_DETECTED_LABEL,
};
pub use form::PatientForm;
pub use patient::{PatientFeatures, FEATURE_COUNT, FEATURE_NAMES};
