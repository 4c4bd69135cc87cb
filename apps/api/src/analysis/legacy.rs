//! Legacy free-text normalization.
//!
//! An alternate analysis backend returns unstructured Markdown-like text
//! with `##` section headers. Each section is located by header substring,
//! sliced until the next `##`, and its bullet lines extracted. Scores are
//! matched as "label, then first 1-3 digit number" and clamped. Absent
//! headers yield field defaults; this mode never fails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::{clamp_score, CanonicalAnalysis};

const STRENGTHS_HEADER: &str = "Key Strengths";
const IMPROVEMENTS_HEADER: &str = "Areas for Improvement";
const COURSES_HEADER: &str = "Recommended Courses";
const RESUME_SCORE_HEADER: &str = "Resume Score";
const ATS_HEADER: &str = "ATS Optimization";
const ASSESSMENT_HEADER: &str = "Overall Assessment";

static RESUME_SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Resume Score:\s*(\d{1,3})").expect("valid regex"));
static ATS_SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ATS Score:\s*(\d{1,3})").expect("valid regex"));
static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*|__|\*|_").expect("valid regex"));

/// Parses legacy free-text output into the canonical record.
pub(crate) fn parse_legacy_text(text: &str) -> CanonicalAnalysis {
    let mut analysis = CanonicalAnalysis::default();

    analysis.matched_skills = bullets_in_section(text, STRENGTHS_HEADER);
    analysis.missing_skills = bullets_in_section(text, IMPROVEMENTS_HEADER);
    analysis.recommendations = bullets_in_section(text, COURSES_HEADER);

    if let Some(section) = section_body(text, ASSESSMENT_HEADER) {
        let assessment = strip_emphasis(section.trim());
        if !assessment.is_empty() {
            analysis.overall_assessment = assessment;
        }
    }

    analysis.match_score = score_in_section(text, RESUME_SCORE_HEADER, &RESUME_SCORE_RE);
    analysis.ats_score = score_in_section(text, ATS_HEADER, &ATS_SCORE_RE);

    analysis
}

/// Slices out a section body: from just after its `##` header line to the
/// next `##` (or end of input). Returns `None` if the header is absent.
fn section_body<'a>(text: &'a str, header: &str) -> Option<&'a str> {
    let start = text.find(&format!("## {header}")).or_else(|| {
        // Tolerate `##Header` without the space.
        text.find(&format!("##{header}"))
    })?;
    let after_header = &text[start..];
    let body_start = after_header.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_header[body_start..];
    match body.find("##") {
        Some(end) => Some(&body[..end]),
        None => Some(body),
    }
}

/// Extracts bullet lines (`-`, `*`, `•`) from a named section, with bullet
/// markers and Markdown emphasis stripped, in order of appearance.
fn bullets_in_section(text: &str, header: &str) -> Vec<String> {
    let Some(body) = section_body(text, header) else {
        return Vec::new();
    };

    body.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let item = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
                .or_else(|| trimmed.strip_prefix("• "))
                .or_else(|| trimmed.strip_prefix('-'))
                .or_else(|| trimmed.strip_prefix('*'))
                .or_else(|| trimmed.strip_prefix('•'))?;
            let cleaned = strip_emphasis(item.trim());
            // Horizontal rules (`---`, `***`) would otherwise survive as
            // marker-only items.
            let is_rule = cleaned.chars().all(|c| matches!(c, '-' | '*' | '•' | '_'));
            (!cleaned.is_empty() && !is_rule).then_some(cleaned)
        })
        .collect()
}

/// Finds a labeled score, preferring the named section but falling back to
/// a whole-document search, and clamps it to [0,100].
fn score_in_section(text: &str, header: &str, pattern: &Regex) -> u8 {
    let haystack = section_body(text, header).unwrap_or(text);
    pattern
        .captures(haystack)
        .or_else(|| pattern.captures(text))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(clamp_score)
        .unwrap_or(0)
}

fn strip_emphasis(text: &str) -> String {
    EMPHASIS_RE.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_ANALYSIS: &str = r#"
## Overall Assessment
A solid resume with **good** fundamentals.

## Key Strengths
- Python
* SQL
• Leadership

## Areas for Improvement
- **Cloud** experience
- Testing discipline

## Recommended Courses
- AWS Certified Solutions Architect

## Resume Score
Resume Score: 78

## ATS Optimization
ATS Score: 65
Missing keywords hurt machine readability.
"#;

    #[test]
    fn test_strengths_extracted_in_order_with_markers_stripped() {
        let analysis = parse_legacy_text(LEGACY_ANALYSIS);
        assert_eq!(analysis.matched_skills, vec!["Python", "SQL", "Leadership"]);
    }

    #[test]
    fn test_emphasis_stripped_from_bullets() {
        let analysis = parse_legacy_text(LEGACY_ANALYSIS);
        assert_eq!(
            analysis.missing_skills,
            vec!["Cloud experience", "Testing discipline"]
        );
    }

    #[test]
    fn test_scores_extracted_and_assessment_cleaned() {
        let analysis = parse_legacy_text(LEGACY_ANALYSIS);
        assert_eq!(analysis.match_score, 78);
        assert_eq!(analysis.ats_score, 65);
        assert_eq!(
            analysis.overall_assessment,
            "A solid resume with good fundamentals."
        );
    }

    #[test]
    fn test_missing_headers_yield_defaults() {
        let analysis = parse_legacy_text("just some prose with no headers");
        assert_eq!(analysis.match_score, 0);
        assert_eq!(analysis.ats_score, 0);
        assert!(analysis.matched_skills.is_empty());
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn test_horizontal_rules_are_not_bullets() {
        let text = "## Key Strengths\n- Python\n---\n- SQL\n***\n";
        let analysis = parse_legacy_text(text);
        assert_eq!(analysis.matched_skills, vec!["Python", "SQL"]);
    }

    #[test]
    fn test_score_clamped() {
        let analysis = parse_legacy_text("## Resume Score\nResume Score: 999\n");
        assert_eq!(analysis.match_score, 100);
    }

    #[test]
    fn test_score_found_outside_its_section() {
        // The label pattern falls back to a whole-document search.
        let analysis = parse_legacy_text("Summary line. Resume Score: 44. More text.");
        assert_eq!(analysis.match_score, 44);
    }
}
