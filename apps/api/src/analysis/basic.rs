//! Basic (non-AI) resume analysis.
//!
//! A cheap structural pass over the extracted text returned alongside the
//! AI analysis: word count, contact-info detection, and which standard
//! resume sections appear. Purely heuristic, no network calls.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\+?\d[\d\s().-]{7,}\d)").expect("valid regex"));

/// Standard section headers looked for, case-insensitively.
const KNOWN_SECTIONS: &[&str] = &[
    "summary",
    "experience",
    "education",
    "skills",
    "projects",
    "certifications",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasicAnalysis {
    pub word_count: usize,
    pub has_email: bool,
    pub has_phone: bool,
    pub sections_detected: Vec<String>,
}

pub fn analyze_text(text: &str) -> BasicAnalysis {
    let lower = text.to_lowercase();

    let sections_detected = KNOWN_SECTIONS
        .iter()
        .filter(|s| lower.contains(*s))
        .map(|s| s.to_string())
        .collect();

    BasicAnalysis {
        word_count: text.split_whitespace().count(),
        has_email: EMAIL_RE.is_match(text),
        has_phone: PHONE_RE.is_match(text),
        sections_detected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_contact_info_and_sections() {
        let text = "Jane Doe\njane@example.com | +1 (555) 010-2233\n\nExperience\n...\nEducation\n...";
        let basic = analyze_text(text);
        assert!(basic.has_email);
        assert!(basic.has_phone);
        assert!(basic.sections_detected.contains(&"experience".to_string()));
        assert!(basic.sections_detected.contains(&"education".to_string()));
        assert!(!basic.sections_detected.contains(&"projects".to_string()));
    }

    #[test]
    fn test_empty_text() {
        let basic = analyze_text("");
        assert_eq!(basic.word_count, 0);
        assert!(!basic.has_email);
        assert!(!basic.has_phone);
        assert!(basic.sections_detected.is_empty());
    }
}
