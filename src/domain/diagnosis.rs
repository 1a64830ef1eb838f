//! Prediction result types.
//!
//! Represents the output of cardiovascular risk scoring as returned to the client.

use serde::{Deserialize, Serialize};

/// Label returned when the probability exceeds one half.
pub const RISK_DETECTED_LABEL: &str = "Heart Disease Risk Detected";

/// Label returned otherwise.
pub const NO_DISEASE_LABEL: &str = "No Heart Disease Detected";

/// Label of the payload returned when a request cannot be processed.
pub const FALLBACK_LABEL: &str = "Unable to process";

const FALLBACK_RECOMMENDATIONS: [&str; 4] = [
    "Consult with a healthcare professional",
    "Regular cardiovascular monitoring",
    "Maintain a healthy lifestyle",
    "Follow up with your doctor",
];

/// Risk tier derived from the probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Probability below 0.3
    Low,
    /// Probability in [0.3, 0.7)
    Moderate,
    /// Probability of 0.7 or above
    High,
}

impl RiskLevel {
    /// Bucket a pre-rounding probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.3 {
            Self::Low
        } else if probability < 0.7 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Short guidance for the tier, used in outcome logs.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "routine prevention",
            Self::Moderate => "clinical follow-up suggested",
            Self::High => "prompt cardiology review suggested",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Raw model output before interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Weighted sum plus rule bonuses, before the logistic transform
    pub risk_score: f64,

    /// Logistic-transformed probability (0.0 to 1.0)
    pub probability: f64,
}

impl Assessment {
    /// Create an assessment from a risk score.
    ///
    /// The probability is `1 / (1 + e^(-2 * risk_score))`.
    #[must_use]
    pub fn from_risk_score(risk_score: f64) -> Self {
        Self {
            risk_score,
            probability: 1.0 / (1.0 + (-2.0 * risk_score).exp()),
        }
    }

    /// Probability as a rounded percentage.
    #[must_use]
    pub fn confidence(&self) -> u8 {
        // Clamped so the cast cannot wrap.
        (self.probability * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Whether the probability is strictly above one half.
    #[must_use]
    pub fn has_risk(&self) -> bool {
        self.probability > 0.5
    }

    /// Get the risk tier based on the pre-rounding probability.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_probability(self.probability)
    }

    /// Get the prediction label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.has_risk() {
            RISK_DETECTED_LABEL
        } else {
            NO_DISEASE_LABEL
        }
    }
}

/// One entry of the feature ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureImportance {
    /// Capitalized feature name
    pub feature: String,

    /// Weight expressed as a rounded percentage
    pub importance: u32,
}

/// Result returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// One of the fixed label strings
    pub prediction: String,

    /// Probability as a percentage (0 to 100)
    pub confidence: u8,

    /// Risk tier
    pub risk_level: RiskLevel,

    /// At most five advisory strings, in generation order
    pub recommendations: Vec<String>,

    /// Static feature ranking, descending; absent in the fallback payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<Vec<FeatureImportance>>,
}

impl PredictionResult {
    /// Fixed payload for requests that could not be processed.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            prediction: FALLBACK_LABEL.to_string(),
            confidence: 0,
            risk_level: RiskLevel::Moderate,
            recommendations: FALLBACK_RECOMMENDATIONS
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
            feature_importance: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_fallback(&self) -> bool {
        self.prediction == FALLBACK_LABEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_from_probability() {
        assert_eq!(RiskLevel::from_probability(0.1), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.29999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.3), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.69999), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.99), RiskLevel::High);
    }

    #[test]
    fn test_zero_score_is_even_odds() {
        let assessment = Assessment::from_risk_score(0.0);
        assert!((assessment.probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(assessment.confidence(), 50);
        // Exactly one half is not a detection
        assert!(!assessment.has_risk());
        assert_eq!(assessment.label(), NO_DISEASE_LABEL);
        assert_eq!(assessment.risk_level(), RiskLevel::Moderate);
    }

    #[test]
    fn test_tier_uses_unrounded_probability() {
        // 0.2996 rounds to a confidence of 30 but is still low
        let risk_score = (0.2996_f64 / (1.0 - 0.2996)).ln() / 2.0;
        let assessment = Assessment::from_risk_score(risk_score);
        assert_eq!(assessment.confidence(), 30);
        assert_eq!(assessment.risk_level(), RiskLevel::Low);
    }

    #[test]
    fn test_risk_level_descriptions() {
        assert_eq!(RiskLevel::Low.description(), "routine prevention");
        assert_eq!(RiskLevel::Moderate.description(), "clinical follow-up suggested");
        assert_eq!(RiskLevel::High.description(), "prompt cardiology review suggested");
    }

    #[test]
    fn test_extreme_scores_stay_in_range() {
        assert_eq!(Assessment::from_risk_score(1e6).confidence(), 100);
        assert_eq!(Assessment::from_risk_score(-1e6).confidence(), 0);
    }

    #[test]
    fn test_fallback_payload() {
        let fallback = PredictionResult::fallback();
        assert!(fallback.is_fallback());
        assert_eq!(fallback.confidence, 0);
        assert_eq!(fallback.risk_level, RiskLevel::Moderate);
        assert_eq!(fallback.recommendations.len(), 4);

        let json = serde_json::to_value(&fallback).expect("Should serialize");
        assert_eq!(json["riskLevel"], "moderate");
        assert_eq!(json["prediction"], "Unable to process");
        assert!(json.get("featureImportance").is_none());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = PredictionResult {
            prediction: RISK_DETECTED_LABEL.to_string(),
            confidence: 97,
            risk_level: RiskLevel::High,
            recommendations: vec!["Annual cardiovascular risk assessment".to_string()],
            feature_importance: Some(vec![FeatureImportance {
                feature: "Cp".to_string(),
                importance: 18,
            }]),
        };

        let json = serde_json::to_value(&result).expect("Should serialize");
        assert_eq!(json["riskLevel"], "high");
        assert_eq!(json["featureImportance"][0]["feature"], "Cp");
        assert_eq!(json["featureImportance"][0]["importance"], 18);
    }
}
