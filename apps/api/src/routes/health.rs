use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health
/// Service status plus which collaborators are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "parley-api",
        "docstore_configured": state.docstore.is_some(),
        "providers": state.llm.provider_names(),
    }))
}
