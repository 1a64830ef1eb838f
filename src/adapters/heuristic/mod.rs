//! Heuristic adapter: Implementation of RiskModel with fixed weights.
//!
//! There is no learned model. The score is a fixed-weight linear combination
//! of normalized features, plus additive rule bonuses, squashed through a
//! logistic function:
//!
//! ```text
//! risk_score  = Σ weight[f] * normalized[f] + Σ bonus[r] (when rule r holds)
//! probability = 1 / (1 + e^(-2 * risk_score))
//! ```
//!
//! Normalization emulates standardization against a reference population:
//! continuous features are centered and scaled, categorical codes are divided
//! by their largest code, binary flags pass through, and ST depression is
//! scaled by 3 and capped at 1.

pub mod recommendations;

use crate::domain::{Assessment, FeatureImportance, PatientFeatures, PredictionResult};
use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::RiskModel;

/// How a raw feature value is brought onto a common scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// `(x - center) / scale`
    Standardize { center: f64, scale: f64 },
    /// `x / max_code`
    Categorical { max_code: f64 },
    /// `min(x / scale, 1)`
    Capped { scale: f64 },
    /// Passed through unchanged
    Identity,
}

impl Normalization {
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Standardize { center, scale } => (x - center) / scale,
            Self::Categorical { max_code } => x / max_code,
            Self::Capped { scale } => (x / scale).min(1.0),
            Self::Identity => x,
        }
    }
}

/// Weight and normalization of one feature.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub weight: f64,
    pub normalization: Normalization,
}

/// Scoring table, in [`FEATURE_NAMES`] order.
pub const FEATURE_TABLE: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec {
        name: FEATURE_NAMES[0],
        weight: 0.15,
        normalization: Normalization::Standardize { center: 54.0, scale: 9.0 },
    },
    FeatureSpec {
        name: FEATURE_NAMES[1],
        weight: 0.12,
        normalization: Normalization::Identity,
    },
    FeatureSpec {
        name: FEATURE_NAMES[2],
        weight: 0.18,
        normalization: Normalization::Categorical { max_code: 3.0 },
    },
    FeatureSpec {
        name: FEATURE_NAMES[3],
        weight: 0.10,
        normalization: Normalization::Standardize { center: 131.0, scale: 17.0 },
    },
    FeatureSpec {
        name: FEATURE_NAMES[4],
        weight: 0.08,
        normalization: Normalization::Standardize { center: 246.0, scale: 51.0 },
    },
    FeatureSpec {
        name: FEATURE_NAMES[5],
        weight: 0.05,
        normalization: Normalization::Identity,
    },
    FeatureSpec {
        name: FEATURE_NAMES[6],
        weight: 0.07,
        normalization: Normalization::Categorical { max_code: 2.0 },
    },
    FeatureSpec {
        name: FEATURE_NAMES[7],
        weight: 0.12,
        normalization: Normalization::Standardize { center: 149.0, scale: 22.0 },
    },
    FeatureSpec {
        name: FEATURE_NAMES[8],
        weight: 0.08,
        normalization: Normalization::Identity,
    },
    FeatureSpec {
        name: FEATURE_NAMES[9],
        weight: 0.10,
        normalization: Normalization::Capped { scale: 3.0 },
    },
    FeatureSpec {
        name: FEATURE_NAMES[10],
        weight: 0.05,
        normalization: Normalization::Categorical { max_code: 2.0 },
    },
];

// Rule bonuses, added whenever their predicate holds.
const AGE_BONUS: f64 = 0.2;
const MALE_BONUS: f64 = 0.15;
const TYPICAL_ANGINA_BONUS: f64 = 0.3;
const HIGH_BP_BONUS: f64 = 0.2;
const HIGH_CHOLESTEROL_BONUS: f64 = 0.15;
const EXERCISE_ANGINA_BONUS: f64 = 0.2;
const ST_DEPRESSION_BONUS: f64 = 0.2;

/// Heuristic cardiovascular risk scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    /// Create a new scorer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Normalize every feature using [`FEATURE_TABLE`].
    #[must_use]
    pub fn normalize(&self, features: &PatientFeatures) -> [f64; FEATURE_COUNT] {
        let raw = features.to_vec();
        let mut normalized = [0.0; FEATURE_COUNT];
        for ((out, spec), x) in normalized.iter_mut().zip(FEATURE_TABLE.iter()).zip(raw) {
            *out = spec.normalization.apply(x);
        }
        normalized
    }

    /// Weighted sum of normalized features, without rule bonuses.
    #[must_use]
    pub fn weighted_sum(&self, features: &PatientFeatures) -> f64 {
        self.normalize(features)
            .iter()
            .zip(FEATURE_TABLE.iter())
            .map(|(value, spec)| value * spec.weight)
            .sum()
    }

    /// Total of the rule bonuses whose predicates hold.
    #[must_use]
    pub fn rule_bonus(&self, features: &PatientFeatures) -> f64 {
        let mut bonus = 0.0;
        if features.age > 55 {
            bonus += AGE_BONUS;
        }
        if features.sex == 1 {
            bonus += MALE_BONUS;
        }
        if features.cp == 0 {
            bonus += TYPICAL_ANGINA_BONUS;
        }
        if features.trestbps > 140 {
            bonus += HIGH_BP_BONUS;
        }
        if features.chol > 240 {
            bonus += HIGH_CHOLESTEROL_BONUS;
        }
        if features.exang == 1 {
            bonus += EXERCISE_ANGINA_BONUS;
        }
        if features.oldpeak > 1.0 {
            bonus += ST_DEPRESSION_BONUS;
        }
        bonus
    }

    /// Risk score before the logistic transform.
    #[must_use]
    pub fn risk_score(&self, features: &PatientFeatures) -> f64 {
        self.weighted_sum(features) + self.rule_bonus(features)
    }

    /// Score one patient.
    #[must_use]
    pub fn score(&self, features: &PatientFeatures) -> PredictionResult {
        let assessment = RiskModel::assess(self, features);
        let risk_level = assessment.risk_level();

        PredictionResult {
            prediction: assessment.label().to_string(),
            confidence: assessment.confidence(),
            risk_level,
            recommendations: recommendations::generate(features, risk_level),
            feature_importance: Some(importance_ranking()),
        }
    }
}

impl RiskModel for RiskScorer {
    fn name(&self) -> &'static str {
        "heuristic-logistic"
    }

    fn description(&self) -> &'static str {
        "Fixed-weight linear combination of normalized features with rule-based adjustments, \
         passed through a logistic function"
    }

    fn assess(&self, features: &PatientFeatures) -> Assessment {
        Assessment::from_risk_score(self.risk_score(features))
    }

    fn predict(&self, features: &PatientFeatures) -> PredictionResult {
        self.score(features)
    }

    fn feature_importance(&self) -> Vec<FeatureImportance> {
        importance_ranking()
    }
}

/// Declared weights as rounded percentages, descending.
///
/// Ties keep table order.
fn importance_ranking() -> Vec<FeatureImportance> {
    let mut ranking: Vec<FeatureImportance> = FEATURE_TABLE
        .iter()
        .map(|spec| FeatureImportance {
            feature: capitalize(spec.name),
            // Weights are small positive constants
            importance: (spec.weight * 100.0).round() as u32,
        })
        .collect();
    ranking.sort_by(|a, b| b.importance.cmp(&a.importance));
    ranking
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
