use std::sync::Arc;

use crate::ai_client::AiModel;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The AI client is held behind a trait object so tests (and alternate
/// backends) can substitute a fake without process-wide side effects.
#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<dyn AiModel>,
    pub config: Config,
}
