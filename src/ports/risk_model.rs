//! Risk model port: Trait for cardiovascular risk scoring.
//!
//! This trait abstracts the scoring implementation from the application logic.

use crate::domain::{Assessment, FeatureImportance, PatientFeatures, PredictionResult};

/// Trait for risk scoring models.
///
/// Implementations are pure: identical features always produce identical
/// results, and no call may fail or touch shared state.
pub trait RiskModel: Send + Sync {
    /// Short identifier of the model.
    fn name(&self) -> &'static str;

    /// One-line description of how the model scores.
    fn description(&self) -> &'static str;

    /// Compute the risk score and probability for one patient.
    fn assess(&self, features: &PatientFeatures) -> Assessment;

    /// Produce the full prediction for one patient.
    fn predict(&self, features: &PatientFeatures) -> PredictionResult;

    /// Ranking of features by importance, descending.
    ///
    /// Not specific to any patient.
    fn feature_importance(&self) -> Vec<FeatureImportance>;
}
