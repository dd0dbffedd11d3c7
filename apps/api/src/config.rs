use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Provider and document-store credentials are optional: without them the
/// interview core runs on fixed banks and constant fallbacks, and the
/// auth/profile endpoints answer 503.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub firebase_project_id: Option<String>,
    pub firebase_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            google_api_key: optional_env("GOOGLE_API_KEY"),
            firebase_project_id: optional_env("FIREBASE_PROJECT_ID"),
            firebase_api_key: optional_env("FIREBASE_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Non-empty environment variable, if set.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
