//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the scoring implementation.

mod risk_model;

pub use risk_model::RiskModel;
