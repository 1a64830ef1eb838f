//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{body::Body, extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tracing::Instrument;

use crate::domain::{FeatureImportance, PredictionResult, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::RiskModel;
use crate::http::AppState;

/// Header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Largest prediction body buffered; anything bigger gets the fallback payload.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

const DISCLAIMER: &str = "This model is for educational purposes only. \
     Always consult with healthcare professionals for medical decisions.";

/// Score a raw form submission.
///
/// The body is taken raw and buffered here rather than through an extractor,
/// so oversized or malformed input is answered with the fallback payload
/// instead of a rejection.
pub async fn predict(State(state): State<Arc<AppState>>, body: Body) -> impl IntoResponse {
    let request_id = request_id();
    let span = tracing::info_span!("predict", request_id = %request_id);

    let result = async {
        let result = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => state.predictions.assess_json_or_fallback(&bytes),
            Err(e) => {
                tracing::warn!("Unable to read prediction request body: {}", e);
                PredictionResult::fallback()
            }
        };

        if !state.simulated_latency.is_zero() {
            tokio::time::sleep(state.simulated_latency).await;
        }

        result
    }
    .instrument(span)
    .await;

    ([(REQUEST_ID_HEADER, request_id)], Json(result))
}

/// Model description returned by `GET /api/model`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: &'static str,
    pub algorithm: &'static str,
    pub feature_count: usize,
    pub features: Vec<&'static str>,
    pub feature_importance: Vec<FeatureImportance>,
    pub disclaimer: &'static str,
}

/// Describe the scoring model
pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfo> {
    let model = state.predictions.model();

    Json(ModelInfo {
        name: model.name(),
        algorithm: model.description(),
        feature_count: FEATURE_COUNT,
        features: FEATURE_NAMES.to_vec(),
        feature_importance: model.feature_importance(),
        disclaimer: DISCLAIMER,
    })
}

/// Liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Generate a v4-format identifier using CSPRNG.
fn request_id() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let mut bytes: [u8; 16] = rng.gen();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
