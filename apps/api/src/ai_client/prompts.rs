//! Prompt templates for resume analysis.
//!
//! The analysis prompt demands strict JSON matching the schema the
//! normalizer expects. Field names here and in `analysis::normalizer`
//! must stay in sync.

/// Fixed instruction template for the structured analysis call.
/// `{resume_text}` is substituted with the extracted resume text.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert resume analyst and career coach.
Your task is to analyze the resume content AND its structure/formatting to provide a structured JSON response.

IMPORTANT:
1. Return ONLY valid JSON.
2. Evaluate strictly. Do NOT give high scores to poorly formatted resumes even if they have keywords.
3. A resume with poor formatting (e.g. long paragraphs, no bullet points, typos, lack of sections) should NOT score above 60, regardless of content match.
4. Detect typos (e.g. "Micro-soft") and penalize accordingly.

Structure the JSON exactly like this:
{
    "candidate_info": {
        "name": "Extracted Name",
        "role": "Detected Role",
        "experience": "Total Experience (e.g. 2 years)",
        "education": "Highest Degree"
    },
    "match_score": 0-100 (integer, penalize for poor format),
    "match_status": "Excellent/Good/Moderate/Poor",
    "formatting_score": 0-100 (integer),
    "formatting_issues": ["Issue 1", "Issue 2"],
    "matched_skills": ["Skill1", "Skill2", ...],
    "missing_skills": ["Skill1", "Skill2", ...],
    "job_context": {
        "title": "Job Title Used",
        "requirements_summary": "Brief summary of key requirements"
    },
    "recommendations": ["Recommendation 1", "Recommendation 2", ...],
    "overall_assessment": "Analysis summary including formatting critique (2-3 sentences)",
    "ats_score": 0-100 (integer),
    "ats_keywords_missing": ["Keyword1", "Keyword2"]
}

Resume Text (Analyze structure from this text representation too):
{resume_text}"#;

/// Builds the full analysis prompt from the resume text plus optional
/// target role and job description.
pub fn build_analysis_prompt(
    resume_text: &str,
    job_role: Option<&str>,
    job_description: Option<&str>,
) -> String {
    let mut prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);

    if let Some(role) = job_role {
        prompt.push_str("\n\nTarget Job Role: ");
        prompt.push_str(role);
    }

    if let Some(jd) = job_description {
        prompt.push_str("\n\nJob Description to compare against:\n");
        prompt.push_str(jd);
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_resume_text() {
        let prompt = build_analysis_prompt("Jane Doe, Rust developer", None, None);
        assert!(prompt.contains("Jane Doe, Rust developer"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_prompt_schema_field_names() {
        // These names are what the normalizer parses; keep them stable.
        for field in [
            "candidate_info",
            "match_score",
            "formatting_score",
            "formatting_issues",
            "matched_skills",
            "missing_skills",
            "job_context",
            "recommendations",
            "overall_assessment",
            "ats_score",
            "ats_keywords_missing",
        ] {
            assert!(
                ANALYSIS_PROMPT_TEMPLATE.contains(field),
                "prompt missing schema field {field}"
            );
        }
    }

    #[test]
    fn test_prompt_appends_role_and_description() {
        let prompt = build_analysis_prompt("text", Some("Data Engineer"), Some("Builds pipelines"));
        assert!(prompt.contains("Target Job Role: Data Engineer"));
        assert!(prompt.contains("Builds pipelines"));
    }

    #[test]
    fn test_prompt_omits_absent_sections() {
        let prompt = build_analysis_prompt("text", None, None);
        assert!(!prompt.contains("Target Job Role"));
        assert!(!prompt.contains("Job Description to compare against"));
    }
}
