//! Canonical analysis record: the single normalized shape consumed by
//! report rendering, independent of which AI mode produced it.

use serde::{Deserialize, Serialize};

pub const FALLBACK_ASSESSMENT: &str = "Analysis failed to generate assessment.";
pub const NOT_DETECTED: &str = "Not Detected";

/// Candidate details the model extracts from the resume itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateInfo {
    pub name: String,
    pub role: String,
    pub experience: String,
    pub education: String,
}

impl Default for CandidateInfo {
    fn default() -> Self {
        Self {
            name: NOT_DETECTED.to_string(),
            role: NOT_DETECTED.to_string(),
            experience: NOT_DETECTED.to_string(),
            education: NOT_DETECTED.to_string(),
        }
    }
}

/// Summary of the job the resume was compared against.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobContext {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub requirements_summary: String,
}

/// The normalized analysis result with guaranteed fields.
///
/// Invariants: every score is clamped to [0,100]; every sequence field is
/// present (possibly empty), never absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAnalysis {
    #[serde(default, deserialize_with = "clamped")]
    pub match_score: u8,
    #[serde(default, deserialize_with = "clamped")]
    pub ats_score: u8,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub overall_assessment: String,
    #[serde(default)]
    pub candidate_info: CandidateInfo,
    #[serde(default, deserialize_with = "clamped")]
    pub formatting_score: u8,
    #[serde(default)]
    pub formatting_issues: Vec<String>,
    #[serde(default)]
    pub job_context: JobContext,
    #[serde(default)]
    pub ats_keywords_missing: Vec<String>,
}

impl Default for CanonicalAnalysis {
    fn default() -> Self {
        Self {
            match_score: 0,
            ats_score: 0,
            matched_skills: Vec::new(),
            missing_skills: Vec::new(),
            recommendations: Vec::new(),
            overall_assessment: FALLBACK_ASSESSMENT.to_string(),
            candidate_info: CandidateInfo::default(),
            formatting_score: 0,
            formatting_issues: Vec::new(),
            job_context: JobContext::default(),
            ats_keywords_missing: Vec::new(),
        }
    }
}

/// Clamps a raw model-supplied score into the canonical [0,100] range.
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}

/// Score fields clamp at the deserialization boundary too, so a record
/// built from external JSON upholds the same [0,100] invariant as one
/// produced by the normalizer.
fn clamped<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(clamp_score(raw))
}
