pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::analysis::handlers as analysis_handlers;
use crate::builder::handlers as builder_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/resume/analyze", post(analysis_handlers::handle_analyze))
        .route("/api/resume/report", post(analysis_handlers::handle_report))
        // Builder API
        .route("/api/builder/generate", post(builder_handlers::handle_generate))
        // Resume uploads can exceed the 2MB default body limit.
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
