use std::sync::Arc;

use crate::auth::tokens::AuthTokenStore;
use crate::docstore::FirestoreClient;
use crate::errors::AppError;
use crate::llm::LlmGateway;
use crate::report::ReportRenderer;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<LlmGateway>,
    /// Absent when Firebase credentials are not configured; auth and profile
    /// endpoints answer 503 in that case.
    pub docstore: Option<Arc<FirestoreClient>>,
    pub sessions: SessionStore,
    pub tokens: AuthTokenStore,
    /// Pluggable report backend. Default: PlainTextRenderer.
    pub report_renderer: Arc<dyn ReportRenderer>,
}

impl AppState {
    pub fn require_docstore(&self) -> Result<&Arc<FirestoreClient>, AppError> {
        self.docstore.as_ref().ok_or(AppError::DocstoreUnavailable)
    }
}
