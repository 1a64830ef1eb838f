//! Advisory recommendations derived from features and the risk tier.
//!
//! Rules run in a fixed order and each appends at most one notice (the tier
//! rule appends two). Only the first [`MAX_RECOMMENDATIONS`] notices are kept,
//! so later rules drop out once earlier ones fill the list.

use crate::domain::{PatientFeatures, RiskLevel};

/// Maximum number of recommendations returned.
pub const MAX_RECOMMENDATIONS: usize = 5;

const SCREENING: &str = "Regular cardiac screening due to advanced age";
const BP_MANAGEMENT: &str = "Monitor and manage high blood pressure with medication if needed";
const BP_MAINTENANCE: &str = "Maintain healthy blood pressure through diet and exercise";
const CHOLESTEROL_REDUCTION: &str =
    "Reduce cholesterol through diet changes and consider statin therapy";
const CHOLESTEROL_MONITORING: &str = "Monitor cholesterol levels and maintain heart-healthy diet";
const SUPERVISED_FITNESS: &str =
    "Gradually increase cardiovascular fitness under medical supervision";
const REGULAR_EXERCISE: &str = "Maintain regular cardiovascular exercise (150 min/week)";
const CHEST_PAIN_ATTENTION: &str = "Seek immediate medical attention for chest pain episodes";
const CARDIOLOGIST_DISCUSSION: &str = "Discuss exercise limitations with your cardiologist";

const HIGH_RISK_NOTICES: [&str; 2] = [
    "Schedule immediate consultation with a cardiologist",
    "Consider cardiac stress testing and imaging",
];
const MODERATE_RISK_NOTICES: [&str; 2] = [
    "Schedule follow-up with your primary care physician",
    "Consider preventive cardiac medications",
];
const LOW_RISK_NOTICES: [&str; 2] = [
    "Continue healthy lifestyle habits",
    "Annual cardiovascular risk assessment",
];

const LIFESTYLE_NOTICES: [&str; 3] = [
    "Follow Mediterranean diet rich in omega-3 fatty acids",
    "Avoid smoking and limit alcohol consumption",
    "Manage stress through relaxation techniques",
];

/// Generate at most [`MAX_RECOMMENDATIONS`] notices, in rule order.
#[must_use]
pub fn generate(features: &PatientFeatures, risk_level: RiskLevel) -> Vec<String> {
    candidates(features, risk_level)
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(str::to_string)
        .collect()
}

/// Every notice the rules produce, before truncation.
fn candidates(features: &PatientFeatures, risk_level: RiskLevel) -> Vec<&'static str> {
    let mut notices = Vec::with_capacity(13);

    if features.age > 60 {
        notices.push(SCREENING);
    }

    if features.trestbps > 140 {
        notices.push(BP_MANAGEMENT);
    } else if features.trestbps > 120 {
        notices.push(BP_MAINTENANCE);
    }

    if features.chol > 240 {
        notices.push(CHOLESTEROL_REDUCTION);
    } else if features.chol > 200 {
        notices.push(CHOLESTEROL_MONITORING);
    }

    if features.thalach < 120 {
        notices.push(SUPERVISED_FITNESS);
    } else {
        notices.push(REGULAR_EXERCISE);
    }

    if features.cp == 0 {
        notices.push(CHEST_PAIN_ATTENTION);
    }

    if features.exang == 1 {
        notices.push(CARDIOLOGIST_DISCUSSION);
    }

    notices.extend(match risk_level {
        RiskLevel::High => HIGH_RISK_NOTICES,
        RiskLevel::Moderate => MODERATE_RISK_NOTICES,
        RiskLevel::Low => LOW_RISK_NOTICES,
    });

    notices.extend(LIFESTYLE_NOTICES);
    notices
}
