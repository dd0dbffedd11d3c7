//! Profile and interview-result endpoints. All of them require a bearer
//! token and the document store.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::auth::handlers::{flatten_user, USERS_COLLECTION};
use crate::auth::tokens::require_user;
use crate::errors::AppError;
use crate::state::AppState;

const RESULTS_LIMIT: u32 = 10;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/profile/save
pub async fn handle_save_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = require_user(&state.tokens, &headers).await?;
    let store = state.require_docstore()?;

    let existing = store
        .get_document(USERS_COLLECTION, &user.email)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut updates = Map::new();
    if let Some(name) = body.get("name").or_else(|| existing.get("name")) {
        updates.insert("name".to_string(), name.clone());
    }
    if let Some(photo) = body.get("photo").or_else(|| existing.get("photo")) {
        updates.insert("photo".to_string(), photo.clone());
    }
    updates.insert("profile".to_string(), Value::Object(body.clone()));
    updates.insert("onboarded".to_string(), json!(1));

    // Root-level mirrors for easier querying
    for key in ["phone", "college", "year", "skills"] {
        if let Some(value) = body.get(key) {
            updates.insert(key.to_string(), value.clone());
        }
    }

    if !store
        .update_document(USERS_COLLECTION, &user.email, &updates)
        .await
    {
        return Err(AppError::Docstore("Failed to update profile".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Profile updated successfully".to_string(),
    }))
}

/// GET /api/profile/get/:user_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Map<String, Value>>, AppError> {
    let user = require_user(&state.tokens, &headers).await?;
    if user.user_id != user_id {
        return Err(AppError::Unauthorized);
    }
    let store = state.require_docstore()?;

    let doc = store
        .get_document(USERS_COLLECTION, &user.email)
        .await
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(flatten_user(doc, &user.email)))
}

/// POST /api/results/save
pub async fn handle_save_results(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = require_user(&state.tokens, &headers).await?;
    let store = state.require_docstore()?;

    let now = Utc::now();
    let mut result = Map::new();
    result.insert("timestamp".to_string(), json!(now.to_rfc3339()));
    result.insert(
        "date".to_string(),
        json!(now.format("%Y-%m-%d %H:%M").to_string()),
    );
    for key in ["scores", "responses", "feedback"] {
        if let Some(value) = body.get(key) {
            result.insert(key.to_string(), value.clone());
        }
    }

    let collection = results_collection(&user.email);
    if store.add_document(&collection, &result).await.is_none() {
        return Err(AppError::Docstore("Failed to save results".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Results saved successfully".to_string(),
    }))
}

/// GET /api/results/get
pub async fn handle_get_results(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Map<String, Value>>>, AppError> {
    let user = require_user(&state.tokens, &headers).await?;
    let store = state.require_docstore()?;

    let mut results = store
        .get_collection(&results_collection(&user.email), RESULTS_LIMIT)
        .await;
    results.sort_by(|a, b| timestamp_of(b).cmp(timestamp_of(a)));

    Ok(Json(results))
}

fn results_collection(email: &str) -> String {
    format!("{USERS_COLLECTION}/{}/results", email.to_lowercase())
}

fn timestamp_of(doc: &Map<String, Value>) -> &str {
    doc.get("timestamp").and_then(Value::as_str).unwrap_or("")
}
