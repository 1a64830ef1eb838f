//! Log sanitization for clinical values and patient identifiers.
//!
//! Applied to every formatted log line before it reaches the sink. Redacts:
//! - Clinical field values written as `name=value`, `name: value` or
//!   `"name":value`, for every form field and feature name
//! - Email addresses
//! - SSN-shaped numbers
//! - Medical record numbers (MRNs)
//!
//! Call sites should still avoid formatting raw clinical values; this is the
//! safety net for the ones that slip through (for example `?features`).
//!
//! # Performance
//!
//! Input per call is capped (see `HEARTSCORE_SANITIZE_MAX_BYTES`); anything
//! past the cap is dropped and marked `[TRUNCATED]`.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Default cap on bytes sanitized per call (16 KiB).
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// Field names whose values are clinical data.
const CLINICAL_FIELDS: &str = "age|sex|cp|trestbps|chol|fbs|restecg|thalach|exang|oldpeak|slope|\
     chestPainType|restingBP|cholesterol|fastingBS|restingECG|maxHR|exerciseAngina|stSlope";

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
}

fn get_patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let sources: Vec<(String, &'static str)> = vec![
            // `age=70`, `age: 70`, `"age":"70"`, `restingBP = "150"`
            (
                format!(r#"\b({CLINICAL_FIELDS})("?\s*[:=]\s*)"?[A-Za-z0-9.+\-]*"?"#),
                "${1}${2}[REDACTED]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b"
                    .to_string(),
                "[REDACTED-EMAIL]",
            ),
            (r"\b\d{3}-\d{2}-\d{4}\b".to_string(), "[REDACTED-SSN]"),
            (r"\bMRN[:\s]?\d{6,10}\b".to_string(), "[REDACTED-MRN]"),
        ];

        let set = RegexSet::new(sources.iter().map(|(p, _)| p.as_str()))
            .expect("Valid regex set");
        let rules = sources
            .iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement: *replacement,
            })
            .collect();

        Patterns { set, rules }
    })
}

fn max_sanitize_bytes() -> usize {
    std::env::var("HEARTSCORE_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Redact clinical values and identifiers from `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule
            .regex
            .replace_all(&result, rule.replacement)
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check whether `input` contains anything [`sanitize`] would redact.
#[must_use]
pub fn contains_sensitive(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    get_patterns().set.is_match(prefix)
}

/// A `tracing_subscriber` writer that sanitizes each formatted line before
/// handing it to the wrapped writer.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        if text.len() <= max_sanitize_bytes() && !contains_sensitive(&text) {
            return self.inner.write_all(text.as_bytes());
        }
        self.inner.write_all(sanitize(&text).as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A line with no newline must not grow the buffer without bound.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        // fmt layers write one event per writer; emit any unterminated tail.
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_sanitize_debug_features() {
        let input = "mapped features PatientFeatures { age: 70, sex: 1, cp: 0, trestbps: 150, oldpeak: 2.0 }";
        let sanitized = sanitize(input);

        assert!(sanitized.contains("age: [REDACTED]"));
        assert!(sanitized.contains("trestbps: [REDACTED]"));
        assert!(sanitized.contains("oldpeak: [REDACTED]"));
        assert!(!sanitized.contains("150"));
        assert!(!sanitized.contains("2.0"));
    }

    #[test]
    fn test_sanitize_key_value_and_json() {
        let sanitized = sanitize(r#"body={"restingBP":"150","cholesterol": 260} maxHR=100"#);

        assert!(!sanitized.contains("150"));
        assert!(!sanitized.contains("260"));
        assert!(!sanitized.contains("100"));
        assert!(sanitized.contains("maxHR=[REDACTED]"));
    }

    #[test]
    fn test_field_names_inside_words_untouched() {
        let input = "storage: 12 items, package=3";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_sanitize_identifiers() {
        let sanitized = sanitize("patient@hospital.com SSN 123-45-6789 MRN:12345678");

        assert!(sanitized.contains("[REDACTED-EMAIL]"));
        assert!(sanitized.contains("[REDACTED-SSN]"));
        assert!(sanitized.contains("[REDACTED-MRN]"));
    }

    #[test]
    fn test_outcome_lines_pass_through() {
        let input = "Prediction complete: risk=high confidence=97";
        assert!(!contains_sensitive(input));
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("age=70 and a long tail of text", 8);
        assert!(sanitized.ends_with("[TRUNCATED]"));
        assert!(!sanitized.contains("70"));
    }

    #[test]
    fn test_outcome_log_line_passes_through() {
        let line = format!(
            "Prediction complete: risk_level={} ({}), confidence=97%, notices=5",
            crate::domain::RiskLevel::High,
            crate::domain::RiskLevel::High.description()
        );
        assert!(!contains_sensitive(&line));
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("Should lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sanitizes_split_lines() {
        let capture = Capture::default();
        {
            let mut writer = SanitizingWriter::new(capture.clone());
            writer.write_all(b"chol=2").expect("Should write");
            writer.write_all(b"60 done\n").expect("Should write");
            writer.write_all(b"tail age=41").expect("Should write");
        }

        let output = String::from_utf8(capture.0.lock().expect("Should lock").clone())
            .expect("Should be UTF-8");
        assert_eq!(output, "chol=[REDACTED] done\ntail age=[REDACTED]");
    }

    #[test]
    fn test_writer_passes_clean_lines_unchanged() {
        let capture = Capture::default();
        {
            let mut writer = SanitizingWriter::new(capture.clone());
            writer.write_all(b"listening on 127.0.0.1:3000\n").expect("Should write");
        }

        let output = String::from_utf8(capture.0.lock().expect("Should lock").clone())
            .expect("Should be UTF-8");
        assert_eq!(output, "listening on 127.0.0.1:3000\n");
    }
}
