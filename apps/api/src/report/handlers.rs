//! Report export endpoint.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::handlers::USERS_COLLECTION;
use crate::auth::tokens::bearer_token;
use crate::errors::AppError;
use crate::report::ReportInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default)]
    pub score_mcq: i64,
    #[serde(default)]
    pub score_interview: i64,
    #[serde(default)]
    pub feedback: Vec<String>,
}

fn default_domain() -> String {
    "General".to_string()
}

/// POST /api/export/report
pub async fn handle_export(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let input = ReportInput {
        candidate_name: resolve_candidate_name(&state, &headers).await,
        domain: req.domain,
        score_mcq: req.score_mcq,
        score_interview: req.score_interview,
        feedback: req.feedback,
        generated_at: Utc::now(),
    };

    let body = state.report_renderer.render(&input);
    let filename = format!(
        "Interview_Report_{}.{}",
        input.generated_at.format("%Y%m%d_%H%M%S"),
        state.report_renderer.file_extension()
    );

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                state.report_renderer.content_type().to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// Candidate name from the document store when a token identifies the
/// caller; "Candidate" otherwise.
async fn resolve_candidate_name(state: &AppState, headers: &HeaderMap) -> String {
    let fallback = || "Candidate".to_string();

    let Some(token) = bearer_token(headers) else {
        return fallback();
    };
    let Some(user) = state.tokens.resolve(token).await else {
        return fallback();
    };
    let Some(store) = state.docstore.as_ref() else {
        return fallback();
    };
    store
        .get_document(USERS_COLLECTION, &user.email)
        .await
        .and_then(|doc| {
            doc.get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(fallback)
}
