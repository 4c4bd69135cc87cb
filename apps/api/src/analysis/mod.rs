//! Resume analysis pipeline: prompt the model, normalize whatever comes
//! back into a [`models::CanonicalAnalysis`], plus a cheap non-AI pass.

pub mod basic;
pub mod handlers;
mod legacy;
pub mod models;
pub mod normalizer;

pub use models::CanonicalAnalysis;
pub use normalizer::{normalize, AiResponse, NormalizeError};
