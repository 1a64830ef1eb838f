//! Patient feature vector for cardiovascular risk scoring.
//!
//! Uses the eleven clinical features of the UCI heart disease dataset,
//! already coerced to their canonical numeric codes.

use serde::{Deserialize, Serialize};

/// Canonical clinical features consumed by a [`crate::ports::RiskModel`].
///
/// Categorical fields hold their integer code, not the label. Values are
/// produced by [`crate::domain::PatientForm::to_features`] or built directly.
/// Continuous fields are signed and unbounded: the mapper keeps whatever
/// non-zero number was submitted, clinically plausible or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    /// Age in years
    pub age: i64,

    /// Sex: 0 = female, 1 = male
    pub sex: u8,

    /// Chest pain type: 0 = typical angina, 1 = atypical angina,
    /// 2 = non-anginal pain, 3 = asymptomatic
    pub cp: u8,

    /// Resting blood pressure in mmHg
    pub trestbps: i64,

    /// Serum cholesterol in mg/dl
    pub chol: i64,

    /// Fasting blood sugar > 120 mg/dl: 0 = no, 1 = yes
    pub fbs: u8,

    /// Resting ECG: 0 = normal, 1 = ST-T wave abnormality,
    /// 2 = left ventricular hypertrophy
    pub restecg: u8,

    /// Maximum heart rate achieved in bpm
    pub thalach: i64,

    /// Exercise-induced angina: 0 = no, 1 = yes
    pub exang: u8,

    /// ST depression induced by exercise relative to rest
    pub oldpeak: f64,

    /// ST segment slope: 0 = upsloping, 1 = flat, 2 = downsloping
    pub slope: u8,
}

impl Default for PatientFeatures {
    /// The vector an entirely empty form maps to.
    fn default() -> Self {
        Self {
            age: 0,
            sex: 0,
            cp: 3,
            trestbps: 120,
            chol: 200,
            fbs: 0,
            restecg: 0,
            thalach: 150,
            exang: 0,
            oldpeak: 0.0,
            slope: 1,
        }
    }
}

impl PatientFeatures {
    /// Convert features to a vector in [`FEATURE_NAMES`] order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.age as f64,
            f64::from(self.sex),
            f64::from(self.cp),
            self.trestbps as f64,
            self.chol as f64,
            f64::from(self.fbs),
            f64::from(self.restecg),
            self.thalach as f64,
            f64::from(self.exang),
            self.oldpeak,
            f64::from(self.slope),
        ]
    }
}

/// Number of features in the scoring vector.
pub const FEATURE_COUNT: usize = 11;

/// Feature names in declaration order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_to_vec() {
        let features = PatientFeatures {
            age: 70,
            sex: 1,
            cp: 0,
            trestbps: 150,
            chol: 260,
            fbs: 0,
            restecg: 0,
            thalach: 100,
            exang: 1,
            oldpeak: 2.0,
            slope: 1,
        };

        let vec = features.to_vec();
        assert_eq!(vec.len(), FEATURE_COUNT);
        assert!((vec[0] - 70.0).abs() < f64::EPSILON);
        assert!((vec[9] - 2.0).abs() < f64::EPSILON);
        assert!((vec[10] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_matches_empty_form_defaults() {
        let features = PatientFeatures::default();
        assert_eq!(features.cp, 3);
        assert_eq!(features.trestbps, 120);
        assert_eq!(features.chol, 200);
        assert_eq!(features.thalach, 150);
        assert_eq!(features.slope, 1);
    }
}
