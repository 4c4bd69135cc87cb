use axum::{http::header, response::IntoResponse, Json};
use tracing::info;

use crate::builder::models::ResumeFormData;
use crate::builder::renderer::render_resume;
use crate::errors::AppError;

/// POST /api/builder/generate
///
/// Turns submitted form data into a downloadable resume PDF named after
/// the candidate.
pub async fn handle_generate(
    Json(data): Json<ResumeFormData>,
) -> Result<impl IntoResponse, AppError> {
    if data.full_name.trim().is_empty() {
        return Err(AppError::Validation("fullName must not be empty".to_string()));
    }

    let bytes = render_resume(&data).map_err(|e| AppError::Render(e.to_string()))?;
    info!(name = %data.full_name, size = bytes.len(), "resume generated");

    let filename = format!("{}_Resume.pdf", data.full_name.trim().replace(' ', "_"));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_filename_spaces_become_underscores() {
        let filename = format!("{}_Resume.pdf", "Jane Mary Doe".trim().replace(' ', "_"));
        assert_eq!(filename, "Jane_Mary_Doe_Resume.pdf");
    }
}
