//! Registration, login, federated sign-in, logout.

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens::{bearer_token, AuthUser};
use crate::errors::AppError;
use crate::state::AppState;

pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

/// Token plus the flattened user document.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct FirebaseAuthRequest {
    #[serde(rename = "idToken")]
    pub id_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// POST /api/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let store = state.require_docstore()?;
    let (email, password) = required_credentials(&req)?;

    if store.get_document(USERS_COLLECTION, email).await.is_some() {
        return Err(AppError::Validation("Email already exists".to_string()));
    }

    let user_id = Uuid::new_v4().to_string();
    let hashed = hash_password(password)?;

    let mut fields = Map::new();
    fields.insert("user_id".to_string(), json!(user_id));
    fields.insert("email".to_string(), json!(email));
    fields.insert("password".to_string(), json!(hashed));
    fields.insert("name".to_string(), json!("User"));
    fields.insert("onboarded".to_string(), json!(0));
    fields.insert("profile".to_string(), json!({}));
    fields.insert("created_at".to_string(), json!(Utc::now().to_rfc3339()));

    if !store.set_document(USERS_COLLECTION, email, &fields).await {
        return Err(AppError::Docstore("Failed to persist user".to_string()));
    }

    info!("Registered new user {user_id}");
    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user_id,
    }))
}

/// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let store = state.require_docstore()?;
    let (email, password) = required_credentials(&req)?;

    let user = store
        .get_document(USERS_COLLECTION, email)
        .await
        .ok_or(AppError::InvalidCredentials)?;

    let verified = user
        .get("password")
        .and_then(Value::as_str)
        .map(|hashed| verify_password(password, hashed))
        .unwrap_or(false);
    if !verified {
        return Err(AppError::InvalidCredentials);
    }

    let user_id = user
        .get("user_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let token = state
        .tokens
        .issue(AuthUser {
            user_id,
            email: email.to_lowercase(),
        })
        .await;

    Ok(Json(AuthResponse {
        token,
        user: flatten_user(user, email),
    }))
}

/// POST /api/auth/firebase
pub async fn handle_firebase_auth(
    State(state): State<AppState>,
    Json(req): Json<FirebaseAuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let store = state.require_docstore()?;
    let id_token = req
        .id_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Missing idToken".to_string()))?;

    let claims = store
        .verify_id_token(id_token)
        .await
        .ok_or(AppError::InvalidCredentials)?;

    let user = match store.get_document(USERS_COLLECTION, &claims.email).await {
        Some(user) => user,
        None => {
            let user_id = Uuid::new_v4().to_string();
            let mut fields = Map::new();
            fields.insert("user_id".to_string(), json!(user_id));
            fields.insert("email".to_string(), json!(claims.email));
            fields.insert("firebase_uid".to_string(), json!(claims.subject));
            fields.insert("name".to_string(), json!(claims.name));
            fields.insert("photo".to_string(), json!(claims.picture));
            fields.insert("onboarded".to_string(), json!(0));
            fields.insert("profile".to_string(), json!({}));
            fields.insert("created_at".to_string(), json!(Utc::now().to_rfc3339()));

            if !store
                .set_document(USERS_COLLECTION, &claims.email, &fields)
                .await
            {
                return Err(AppError::Docstore("Failed to persist user".to_string()));
            }
            info!("Created user {user_id} from verified ID token");
            fields
        }
    };

    let user_id = user
        .get("user_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let token = state
        .tokens
        .issue(AuthUser {
            user_id,
            email: claims.email.to_lowercase(),
        })
        .await;

    Ok(Json(AuthResponse {
        token,
        user: flatten_user(user, &claims.email),
    }))
}

/// POST /api/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<LogoutResponse> {
    if let Some(token) = bearer_token(&headers) {
        state.tokens.revoke(token).await;
    }
    Json(LogoutResponse { success: true })
}

fn required_credentials(req: &CredentialsRequest) -> Result<(&str, &str), AppError> {
    match (req.email.as_deref(), req.password.as_deref()) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Ok((email, password))
        }
        _ => Err(AppError::Validation(
            "Email and password required".to_string(),
        )),
    }
}

/// Merges the nested profile map over the root document and strips fields
/// that must not reach the client.
pub(crate) fn flatten_user(mut user: Map<String, Value>, email: &str) -> Map<String, Value> {
    if let Some(Value::Object(profile)) = user.remove("profile") {
        for (key, value) in profile {
            user.insert(key, value);
        }
    }
    user.remove("password");
    user.insert("email".to_string(), json!(email));
    user
}
