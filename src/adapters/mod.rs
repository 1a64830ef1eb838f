//! Adapters layer: Concrete implementations of ports.
//!
//! - `heuristic`: fixed-weight logistic risk scorer
//! - `sanitize`: clinical value filtering for logs

pub mod heuristic;
pub mod sanitize;

pub use heuristic::RiskScorer;
