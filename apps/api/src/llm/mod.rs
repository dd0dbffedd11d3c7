//! Text-Completion Gateway — the single point of entry for all remote LLM
//! calls in Parley.
//!
//! ARCHITECTURAL RULE: no other module may call a provider API directly.
//! All LLM interactions MUST go through this module.
//!
//! Providers are tried in priority order. Every provider failure is contained
//! here and surfaces to callers as an absent result, never an error; each
//! caller decides its own fallback value.

pub mod gemini;
pub mod openai;
pub mod parse;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Bound on every remote provider round-trip.
const PROVIDER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned empty content")]
    EmptyContent,
}

/// One remote text-completion backend.
///
/// Implementations own their wire format and credential. The gateway only
/// sees prompt + temperature in, text out.
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError>;
}

/// Ordered provider chain with per-attempt failure isolation.
///
/// Adding a provider means appending to the chain; callers never change.
pub struct LlmGateway {
    providers: Vec<Arc<dyn TextProvider>>,
}

impl LlmGateway {
    pub fn new(providers: Vec<Arc<dyn TextProvider>>) -> Self {
        Self { providers }
    }

    /// Builds the chain from configured credentials: OpenAI first, Gemini
    /// second. Either or both may be absent.
    pub fn from_config(config: &Config) -> Self {
        let mut providers: Vec<Arc<dyn TextProvider>> = Vec::new();
        if let Some(key) = &config.openai_api_key {
            providers.push(Arc::new(openai::OpenAiProvider::new(key.clone())));
            info!("OpenAI provider configured (model: {})", openai::OPENAI_MODEL);
        }
        if let Some(key) = &config.google_api_key {
            providers.push(Arc::new(gemini::GeminiProvider::new(key.clone())));
            info!("Gemini provider configured (model: {})", gemini::GEMINI_MODEL);
        }
        Self { providers }
    }

    /// Names of the configured providers, in trial order.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Sends the prompt to the first provider that answers.
    ///
    /// `temperature` is passed through unchanged, no validation. A provider
    /// that errors in any way is skipped with a warning. No retries within a
    /// call; with the chain exhausted the result is absent.
    pub async fn generate_text(&self, prompt: &str, temperature: f32) -> Option<String> {
        for provider in &self.providers {
            match provider.complete(prompt, temperature).await {
                Ok(text) => {
                    debug!(
                        "{} completion succeeded ({} chars)",
                        provider.name(),
                        text.len()
                    );
                    return Some(text);
                }
                Err(e) => warn!("{} provider failed: {e}", provider.name()),
            }
        }
        None
    }
}
