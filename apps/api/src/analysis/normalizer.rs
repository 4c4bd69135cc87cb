//! Turns raw AI output into a [`CanonicalAnalysis`].
//!
//! Two input shapes exist. Structured mode expects one JSON object matching
//! the prompt schema; a parse failure is a hard error so callers can tell
//! "model returned garbage" from "model returned an incomplete but valid
//! object". Legacy mode (kept for an alternate free-text backend) degrades
//! gracefully: a missing section yields the field default, never an error.
//!
//! The renderer only ever sees the canonical record; this module fully
//! erases which mode produced it.

use serde::Deserialize;
use thiserror::Error;

use crate::analysis::legacy;
use crate::analysis::models::{clamp_score, CanonicalAnalysis, CandidateInfo, JobContext};

/// Raw AI output, tagged by the expected shape.
#[derive(Debug, Clone)]
pub enum AiResponse {
    /// A JSON object matching the documented schema (possibly fence-wrapped).
    Structured(String),
    /// Free-form Markdown-like text with `##` section headers.
    Legacy(String),
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("malformed AI response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// The schema the model is instructed to return. Every field optional so a
/// valid-but-incomplete object normalizes instead of erroring.
#[derive(Debug, Deserialize)]
struct RawStructuredAnalysis {
    candidate_info: Option<RawCandidateInfo>,
    match_score: Option<i64>,
    formatting_score: Option<i64>,
    formatting_issues: Option<Vec<String>>,
    matched_skills: Option<Vec<String>>,
    missing_skills: Option<Vec<String>>,
    job_context: Option<RawJobContext>,
    recommendations: Option<Vec<String>>,
    overall_assessment: Option<String>,
    ats_score: Option<i64>,
    ats_keywords_missing: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawCandidateInfo {
    name: Option<String>,
    role: Option<String>,
    experience: Option<String>,
    education: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawJobContext {
    title: Option<String>,
    requirements_summary: Option<String>,
}

/// Normalizes raw AI output into the canonical record.
pub fn normalize(response: AiResponse) -> Result<CanonicalAnalysis, NormalizeError> {
    match response {
        AiResponse::Structured(text) => normalize_structured(&text),
        AiResponse::Legacy(text) => Ok(legacy::parse_legacy_text(&text)),
    }
}

fn normalize_structured(text: &str) -> Result<CanonicalAnalysis, NormalizeError> {
    let stripped = strip_code_fences(text);
    let raw: RawStructuredAnalysis = serde_json::from_str(stripped)?;

    let defaults = CanonicalAnalysis::default();

    let candidate_info = match raw.candidate_info {
        Some(info) => {
            let d = CandidateInfo::default();
            CandidateInfo {
                name: info.name.unwrap_or(d.name),
                role: info.role.unwrap_or(d.role),
                experience: info.experience.unwrap_or(d.experience),
                education: info.education.unwrap_or(d.education),
            }
        }
        None => CandidateInfo::default(),
    };

    let job_context = match raw.job_context {
        Some(ctx) => JobContext {
            title: ctx.title.unwrap_or_default(),
            requirements_summary: ctx.requirements_summary.unwrap_or_default(),
        },
        None => JobContext::default(),
    };

    Ok(CanonicalAnalysis {
        match_score: raw.match_score.map(clamp_score).unwrap_or(0),
        ats_score: raw.ats_score.map(clamp_score).unwrap_or(0),
        matched_skills: raw.matched_skills.unwrap_or_default(),
        missing_skills: raw.missing_skills.unwrap_or_default(),
        recommendations: raw.recommendations.unwrap_or_default(),
        overall_assessment: raw
            .overall_assessment
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.overall_assessment),
        candidate_info,
        formatting_score: raw.formatting_score.map(clamp_score).unwrap_or(0),
        formatting_issues: raw.formatting_issues.unwrap_or_default(),
        job_context,
        ats_keywords_missing: raw.ats_keywords_missing.unwrap_or_default(),
    })
}

/// Strips ```json ... ``` or ``` ... ``` fences the model sometimes wraps
/// around its JSON output.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{FALLBACK_ASSESSMENT, NOT_DETECTED};

    const FULL_RESPONSE: &str = r#"{
        "candidate_info": {
            "name": "Jane Doe",
            "role": "Backend Engineer",
            "experience": "4 years",
            "education": "BSc Computer Science"
        },
        "match_score": 82,
        "match_status": "Excellent",
        "formatting_score": 75,
        "formatting_issues": ["Dense paragraphs in summary"],
        "matched_skills": ["Rust", "PostgreSQL"],
        "missing_skills": ["Kubernetes"],
        "job_context": {
            "title": "Senior Backend Engineer",
            "requirements_summary": "Rust services at scale"
        },
        "recommendations": ["Add container orchestration experience"],
        "overall_assessment": "Strong match with minor formatting issues.",
        "ats_score": 88,
        "ats_keywords_missing": ["Docker"]
    }"#;

    #[test]
    fn test_full_structured_response() {
        let analysis = normalize(AiResponse::Structured(FULL_RESPONSE.to_string())).unwrap();
        assert_eq!(analysis.match_score, 82);
        assert_eq!(analysis.ats_score, 88);
        assert_eq!(analysis.candidate_info.name, "Jane Doe");
        assert_eq!(analysis.matched_skills, vec!["Rust", "PostgreSQL"]);
        assert_eq!(analysis.job_context.title, "Senior Backend Engineer");
    }

    #[test]
    fn test_fence_wrapped_json_is_accepted() {
        let wrapped = format!("```json\n{FULL_RESPONSE}\n```");
        let analysis = normalize(AiResponse::Structured(wrapped)).unwrap();
        assert_eq!(analysis.match_score, 82);
    }

    #[test]
    fn test_missing_ats_score_defaults_to_zero() {
        let json = r#"{"match_score": 70, "matched_skills": ["Rust"]}"#;
        let analysis = normalize(AiResponse::Structured(json.to_string())).unwrap();
        assert_eq!(analysis.ats_score, 0);
        assert_eq!(analysis.match_score, 70);
        // Sequences are present even when absent from the payload.
        assert!(analysis.missing_skills.is_empty());
        assert!(analysis.recommendations.is_empty());
        assert_eq!(analysis.overall_assessment, FALLBACK_ASSESSMENT);
        assert_eq!(analysis.candidate_info.education, NOT_DETECTED);
    }

    #[test]
    fn test_invalid_json_is_a_hard_error() {
        let result = normalize(AiResponse::Structured("not json at all".to_string()));
        assert!(matches!(result, Err(NormalizeError::MalformedResponse(_))));
    }

    #[test]
    fn test_scores_clamped_to_valid_range() {
        let json = r#"{"match_score": 250, "ats_score": -20, "formatting_score": 101}"#;
        let analysis = normalize(AiResponse::Structured(json.to_string())).unwrap();
        assert_eq!(analysis.match_score, 100);
        assert_eq!(analysis.ats_score, 0);
        assert_eq!(analysis.formatting_score, 100);
    }

    #[test]
    fn test_legacy_mode_never_errors() {
        let analysis = normalize(AiResponse::Legacy("no headers here".to_string())).unwrap();
        assert_eq!(analysis.match_score, 0);
        assert!(analysis.matched_skills.is_empty());
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
    }
}
