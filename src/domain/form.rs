//! Raw form input and its mapping onto [`PatientFeatures`].
//!
//! The mapping is total: every missing, unparseable or unexpected value
//! resolves to a fixed default instead of an error.

use serde::{Deserialize, Deserializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::patient::PatientFeatures;

/// Chest pain labels and their codes. Unmapped labels fall back to asymptomatic.
const CHEST_PAIN_CODES: [(&str, u8); 4] = [("TA", 0), ("ATA", 1), ("NAP", 2), ("ASY", 3)];
const CHEST_PAIN_DEFAULT: u8 = 3;

/// Resting ECG labels and their codes. Unmapped labels fall back to normal.
const RESTING_ECG_CODES: [(&str, u8); 3] = [("Normal", 0), ("ST", 1), ("LVH", 2)];
const RESTING_ECG_DEFAULT: u8 = 0;

/// ST slope labels and their codes. Unmapped labels fall back to flat.
const ST_SLOPE_CODES: [(&str, u8); 3] = [("Up", 0), ("Flat", 1), ("Down", 2)];
const ST_SLOPE_DEFAULT: u8 = 1;

const AGE_DEFAULT: i64 = 0;
const RESTING_BP_DEFAULT: i64 = 120;
const CHOLESTEROL_DEFAULT: i64 = 200;
const MAX_HR_DEFAULT: i64 = 150;
const OLDPEAK_DEFAULT: f64 = 0.0;

/// Raw patient form as submitted by the client.
///
/// Every field is optional text. JSON numbers are accepted and read through
/// their decimal representation; any other JSON type counts as absent.
///
/// # Security
///
/// Implements `ZeroizeOnDrop`: raw clinical text is wiped when the form is
/// dropped. `Debug` reports which fields are present, never their values.
#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PatientForm {
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: Option<String>,

    /// "M" for male, anything else is female
    #[serde(default, deserialize_with = "lenient_text")]
    pub sex: Option<String>,

    /// One of TA, ATA, NAP, ASY
    #[serde(rename = "chestPainType", default, deserialize_with = "lenient_text")]
    pub chest_pain_type: Option<String>,

    #[serde(rename = "restingBP", default, deserialize_with = "lenient_text")]
    pub resting_bp: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub cholesterol: Option<String>,

    /// "1" when fasting blood sugar exceeds 120 mg/dl
    #[serde(rename = "fastingBS", default, deserialize_with = "lenient_text")]
    pub fasting_bs: Option<String>,

    /// One of Normal, ST, LVH
    #[serde(rename = "restingECG", default, deserialize_with = "lenient_text")]
    pub resting_ecg: Option<String>,

    #[serde(rename = "maxHR", default, deserialize_with = "lenient_text")]
    pub max_hr: Option<String>,

    /// "Y" when angina is induced by exercise
    #[serde(rename = "exerciseAngina", default, deserialize_with = "lenient_text")]
    pub exercise_angina: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub oldpeak: Option<String>,

    /// One of Up, Flat, Down
    #[serde(rename = "stSlope", default, deserialize_with = "lenient_text")]
    pub st_slope: Option<String>,
}

impl PatientForm {
    /// Map the raw form onto canonical features.
    ///
    /// Never fails; see the module documentation for the fallback policy.
    #[must_use]
    pub fn to_features(&self) -> PatientFeatures {
        PatientFeatures {
            age: nonzero_integer_or(self.age.as_deref(), AGE_DEFAULT),
            sex: flag(self.sex.as_deref(), "M"),
            cp: lookup(
                &CHEST_PAIN_CODES,
                self.chest_pain_type.as_deref(),
                CHEST_PAIN_DEFAULT,
            ),
            trestbps: nonzero_integer_or(self.resting_bp.as_deref(), RESTING_BP_DEFAULT),
            chol: nonzero_integer_or(self.cholesterol.as_deref(), CHOLESTEROL_DEFAULT),
            fbs: flag(self.fasting_bs.as_deref(), "1"),
            restecg: lookup(
                &RESTING_ECG_CODES,
                self.resting_ecg.as_deref(),
                RESTING_ECG_DEFAULT,
            ),
            thalach: nonzero_integer_or(self.max_hr.as_deref(), MAX_HR_DEFAULT),
            exang: flag(self.exercise_angina.as_deref(), "Y"),
            oldpeak: nonzero_decimal_or(self.oldpeak.as_deref(), OLDPEAK_DEFAULT),
            slope: lookup(&ST_SLOPE_CODES, self.st_slope.as_deref(), ST_SLOPE_DEFAULT),
        }
    }

    /// Names of the fields that were submitted with a value.
    #[must_use]
    pub fn present_fields(&self) -> Vec<&'static str> {
        [
            ("age", &self.age),
            ("sex", &self.sex),
            ("chestPainType", &self.chest_pain_type),
            ("restingBP", &self.resting_bp),
            ("cholesterol", &self.cholesterol),
            ("fastingBS", &self.fasting_bs),
            ("restingECG", &self.resting_ecg),
            ("maxHR", &self.max_hr),
            ("exerciseAngina", &self.exercise_angina),
            ("oldpeak", &self.oldpeak),
            ("stSlope", &self.st_slope),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_some())
        .map(|(name, _)| name)
        .collect()
    }
}

impl std::fmt::Debug for PatientForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientForm")
            .field("present", &self.present_fields())
            .finish()
    }
}

/// Accept a string or number; everything else is treated as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn flag(value: Option<&str>, truthy: &str) -> u8 {
    u8::from(value == Some(truthy))
}

fn lookup(table: &[(&str, u8)], value: Option<&str>, default: u8) -> u8 {
    value
        .and_then(|v| table.iter().find(|(label, _)| *label == v))
        .map_or(default, |(_, code)| *code)
}

/// Zero and unparseable values resolve to `default`; negatives are kept.
fn nonzero_integer_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(leading_integer)
        .filter(|&v| v != 0)
        .unwrap_or(default)
}

fn nonzero_decimal_or(value: Option<&str>, default: f64) -> f64 {
    value
        .and_then(leading_decimal)
        .filter(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(default)
}

/// Parse the longest integer prefix after leading whitespace (`"45.9"` is 45).
fn leading_integer(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the longest decimal prefix after leading whitespace (`"1.5mm"` is 1.5).
fn leading_decimal(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |p| start + p)
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
