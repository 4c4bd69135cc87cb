use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not parse AI response: {0}")]
    AiResponse(String),

    #[error("AI service error: {0}")]
    Ai(String),

    #[error("Report rendering failed: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::AiResponse(msg) => {
                tracing::warn!("AI response unparseable: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "AI_RESPONSE_ERROR",
                    format!("Could not parse AI response: {msg}"),
                )
            }
            AppError::Ai(msg) => {
                tracing::error!("AI service error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Render(msg) => {
                tracing::error!("Render error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "Failed to generate PDF report".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
