use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// The process refuses to start if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the Gemini API.
    pub gemini_api_key: String,
    /// Explicit path to the pdfium dynamic library, if the system copy
    /// cannot be found automatically. Optional; OCR degrades without it.
    pub pdfium_lib_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            pdfium_lib_path: std::env::var("PDFIUM_DYNAMIC_LIB_PATH").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
