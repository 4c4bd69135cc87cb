use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai_client::prompts::build_analysis_prompt;
use crate::analysis::basic::{analyze_text, BasicAnalysis};
use crate::analysis::models::CanonicalAnalysis;
use crate::analysis::normalizer::{normalize, AiResponse, NormalizeError};
use crate::errors::AppError;
use crate::extraction::{DocumentFormat, TextExtractor};
use crate::report::render_report;
use crate::state::AppState;

const DEFAULT_JOB_ROLE: &str = "Software Engineer";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub text: String,
    pub basic_analysis: BasicAnalysis,
    pub ai_analysis: CanonicalAnalysis,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub candidate_name: Option<String>,
    pub job_role: Option<String>,
    pub analysis_result: CanonicalAnalysis,
}

/// POST /api/resume/analyze
///
/// Multipart fields: `file` (the resume), optional `job_role` and
/// `job_description`. Extracts text, asks the model for a structured
/// analysis, and returns the normalized result alongside the raw text.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename = String::from("resume.pdf");
    let mut job_role: Option<String> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                if let Some(name) = field.file_name() {
                    filename = name.to_string();
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read file: {e}")))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("job_role") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_role: {e}")))?;
                if !value.trim().is_empty() {
                    job_role = Some(value);
                }
            }
            Some("job_description") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_description: {e}")))?;
                if !value.trim().is_empty() {
                    job_description = Some(value);
                }
            }
            _ => {}
        }
    }

    let file_bytes =
        file_bytes.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let job_role = job_role.unwrap_or_else(|| DEFAULT_JOB_ROLE.to_string());

    info!(
        filename = %filename,
        size = file_bytes.len(),
        job_role = %job_role,
        "analyzing resume"
    );

    // Extraction can hit the OCR path, which shells out and rasterizes pages.
    let format = DocumentFormat::from_filename(&filename);
    let extractor = TextExtractor::new(state.config.pdfium_lib_path.clone());
    let text = tokio::task::spawn_blocking(move || extractor.extract(&file_bytes, format))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from file.".to_string(),
        ));
    }

    let prompt = build_analysis_prompt(&text, Some(&job_role), job_description.as_deref());
    let raw = state
        .ai
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Ai(e.to_string()))?;

    let ai_analysis = match normalize(AiResponse::Structured(raw)) {
        Ok(analysis) => analysis,
        Err(NormalizeError::MalformedResponse(e)) => {
            return Err(AppError::AiResponse(e.to_string()));
        }
    };

    Ok(Json(AnalyzeResponse {
        basic_analysis: analyze_text(&text),
        ai_analysis,
        text,
    }))
}

/// POST /api/resume/report
///
/// Renders a previously obtained analysis result into a downloadable PDF.
pub async fn handle_report(
    Json(req): Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let candidate_name = req.candidate_name.as_deref().unwrap_or("Candidate");
    let job_role = req.job_role.as_deref().unwrap_or(DEFAULT_JOB_ROLE);

    let bytes = render_report(&req.analysis_result, candidate_name, job_role)
        .map_err(|e| AppError::Render(e.to_string()))?;

    info!(size = bytes.len(), "report rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=Resume_Analysis_Report.pdf".to_string(),
            ),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_request_accepts_camel_case() {
        let req: ReportRequest = serde_json::from_str(
            r#"{
                "candidateName": "Jane Doe",
                "jobRole": "Data Engineer",
                "analysisResult": {"matchScore": 70}
            }"#,
        )
        .unwrap();
        assert_eq!(req.candidate_name.as_deref(), Some("Jane Doe"));
        assert_eq!(req.analysis_result.match_score, 70);
        assert!(req.analysis_result.matched_skills.is_empty());
    }

    #[test]
    fn test_analyze_response_shape() {
        let response = AnalyzeResponse {
            text: "resume text".to_string(),
            basic_analysis: analyze_text("resume text"),
            ai_analysis: CanonicalAnalysis::default(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("text").is_some());
        assert!(json.get("basicAnalysis").is_some());
        assert!(json.get("aiAnalysis").is_some());
        assert!(json["basicAnalysis"].get("wordCount").is_some());
    }
}
