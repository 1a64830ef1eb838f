//! Prediction service: Orchestrates form mapping and risk scoring.
//!
//! This service coordinates:
//! - Request body parsing
//! - Form to feature mapping
//! - Scoring through the configured model

use std::sync::Arc;

use crate::domain::{PatientFeatures, PatientForm, PredictionResult};
use crate::ports::RiskModel;
use crate::HeartscoreError;

/// Service for turning raw requests into predictions.
///
/// Stateless apart from the shared model; safe to call concurrently.
pub struct PredictionService<M>
where
    M: RiskModel,
{
    model: Arc<M>,
}

impl<M> Clone for PredictionService<M>
where
    M: RiskModel,
{
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
        }
    }
}

impl<M> PredictionService<M>
where
    M: RiskModel,
{
    /// Create a new prediction service.
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    /// The model used for scoring.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Score canonical features.
    #[must_use]
    pub fn predict(&self, features: &PatientFeatures) -> PredictionResult {
        let result = self.model.predict(features);

        tracing::info!(
            "Prediction complete: risk_level={} ({}), confidence={}%, notices={}",
            result.risk_level,
            result.risk_level.description(),
            result.confidence,
            result.recommendations.len()
        );

        result
    }

    /// Map a raw form and score it.
    #[must_use]
    pub fn assess(&self, form: &PatientForm) -> PredictionResult {
        tracing::debug!("Mapping form with fields {:?}", form.present_fields());
        let features = form.to_features();
        tracing::debug!("Mapped {:?}", features);

        self.predict(&features)
    }

    /// Parse a JSON request body, map it and score it.
    ///
    /// # Errors
    /// Returns `InvalidJson` if the body is not JSON and `MalformedRequest`
    /// if it is JSON but not an object.
    pub fn assess_json(&self, body: &[u8]) -> Result<PredictionResult, HeartscoreError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(HeartscoreError::MalformedRequest(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }

        let form: PatientForm = serde_json::from_value(value)?;
        Ok(self.assess(&form))
    }

    /// Like [`Self::assess_json`], but answers with the fallback payload on error.
    #[must_use]
    pub fn assess_json_or_fallback(&self, body: &[u8]) -> PredictionResult {
        match self.assess_json(body) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Unable to process prediction request: {}", e);
                PredictionResult::fallback()
            }
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
