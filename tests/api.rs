//! End-to-end tests of the HTTP boundary.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use heartscore::http::{create_router, handlers::REQUEST_ID_HEADER, AppState};

fn app() -> Router {
    create_router(Arc::new(AppState::default()))
}

async fn post_predict(body: impl Into<Body>) -> (StatusCode, bool, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .expect("Should build request");

    let response = app().oneshot(request).await.expect("Should respond");
    let status = response.status();
    let has_request_id = response.headers().contains_key(REQUEST_ID_HEADER);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let json = serde_json::from_slice(&bytes).expect("Should be JSON");
    (status, has_request_id, json)
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Should build request");

    let response = app().oneshot(request).await.expect("Should respond");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    (status, serde_json::from_slice(&bytes).expect("Should be JSON"))
}

#[tokio::test]
async fn test_high_risk_form() {
    let form = json!({
        "age": "70",
        "sex": "M",
        "chestPainType": "TA",
        "restingBP": "150",
        "cholesterol": "260",
        "fastingBS": "0",
        "restingECG": "Normal",
        "maxHR": "100",
        "exerciseAngina": "Y",
        "oldpeak": "2.0",
        "stSlope": "Flat"
    });

    let (status, has_request_id, json) = post_predict(form.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(has_request_id);
    assert_eq!(json["prediction"], "Heart Disease Risk Detected");
    assert_eq!(json["riskLevel"], "high");
    assert_eq!(json["confidence"], 97);
    assert_eq!(json["recommendations"].as_array().map(Vec::len), Some(5));
    assert_eq!(
        json["recommendations"][0],
        "Regular cardiac screening due to advanced age"
    );
    assert_eq!(json["featureImportance"].as_array().map(Vec::len), Some(11));
    assert_eq!(json["featureImportance"][0], json!({ "feature": "Cp", "importance": 18 }));
}

#[tokio::test]
async fn test_numeric_json_values_are_accepted() {
    let form = json!({
        "age": 30,
        "sex": "F",
        "chestPainType": "NAP",
        "restingBP": 110,
        "cholesterol": 180,
        "fastingBS": 0,
        "restingECG": "Normal",
        "maxHR": 100,
        "exerciseAngina": "N",
        "oldpeak": 0,
        "stSlope": "Up"
    });

    let (status, _, json) = post_predict(form.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prediction"], "No Heart Disease Detected");
    assert_eq!(json["riskLevel"], "low");
}

#[tokio::test]
async fn test_malformed_body_returns_fallback() {
    for body in ["{\"age\": ", "", "[]", "null"] {
        let (status, has_request_id, json) = post_predict(body.to_string()).await;

        assert_eq!(status, StatusCode::OK, "body {body:?}");
        assert!(has_request_id);
        assert_eq!(
            json,
            json!({
                "prediction": "Unable to process",
                "confidence": 0,
                "riskLevel": "moderate",
                "recommendations": [
                    "Consult with a healthcare professional",
                    "Regular cardiovascular monitoring",
                    "Maintain a healthy lifestyle",
                    "Follow up with your doctor"
                ]
            }),
            "body {body:?}"
        );
    }
}

#[tokio::test]
async fn test_oversized_body_returns_fallback() {
    let padding = " ".repeat(3 * 1024 * 1024);
    let body = format!(r#"{{"age":"70","sex":"M"{padding}}}"#);

    let (status, has_request_id, json) = post_predict(body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(has_request_id);
    assert_eq!(json["prediction"], "Unable to process");
    assert_eq!(json["confidence"], 0);
    assert_eq!(json["riskLevel"], "moderate");
    assert!(json.get("featureImportance").is_none());
}

#[tokio::test]
async fn test_negative_values_are_scored_not_rejected() {
    let form = json!({ "restingBP": "-5", "maxHR": "-80", "cholesterol": "5000000000" });

    let (status, _, json) = post_predict(form.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_ne!(json["prediction"], "Unable to process");
}

#[tokio::test]
async fn test_missing_content_type_still_scored() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .body(Body::from(r#"{"age":"45"}"#))
        .expect("Should build request");

    let response = app().oneshot(request).await.expect("Should respond");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let json: Value = serde_json::from_slice(&bytes).expect("Should be JSON");
    assert_ne!(json["prediction"], "Unable to process");
}

#[tokio::test]
async fn test_model_info() {
    let (status, json) = get_json("/api/model").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "heuristic-logistic");
    assert_eq!(json["featureCount"], 11);
    assert_eq!(json["features"][0], "age");
    assert_eq!(json["featureImportance"].as_array().map(Vec::len), Some(11));
}

#[tokio::test]
async fn test_health() {
    let (status, json) = get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}
