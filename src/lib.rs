//! # Heartscore
//!
//! Heuristic cardiovascular risk scoring behind a single JSON request/response
//! exchange.
//!
//! This crate provides:
//! - A total mapping from raw form input to canonical clinical features
//! - A fixed-weight logistic risk scorer with rule-based adjustments
//! - A rule-driven recommendation list
//! - An HTTP boundary that always answers with a well-formed payload
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientForm, PatientFeatures, PredictionResult)
//! - `ports`: Trait definitions for scoring models
//! - `adapters`: Concrete implementations (heuristic scorer, log sanitization)
//! - `application`: Use cases orchestrating domain and ports
//! - `http`: Request boundary (axum)

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod ports;

pub use domain::{PatientFeatures, PatientForm, PredictionResult, RiskLevel};

/// Result type for Heartscore operations
pub type Result<T> = std::result::Result<T, HeartscoreError>;

/// Main error type for Heartscore
#[derive(Debug, thiserror::Error)]
pub enum HeartscoreError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
