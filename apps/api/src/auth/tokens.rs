//! Bearer-token store — opaque in-memory auth sessions.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header, HeaderMap};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;

/// Identity carried by a live auth token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Keyed map of opaque bearer tokens to identities. Tokens live until logout
/// or process restart; no refresh.
#[derive(Clone, Default)]
pub struct AuthTokenStore {
    inner: Arc<RwLock<HashMap<String, AuthUser>>>,
}

impl AuthTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn issue(&self, user: AuthUser) -> String {
        let token = Uuid::new_v4().to_string();
        self.inner.write().await.insert(token.clone(), user);
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<AuthUser> {
        self.inner.read().await.get(token).cloned()
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }
}

/// Extracts the bearer token from the Authorization header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolves the request identity or rejects with 401.
pub async fn require_user(
    store: &AuthTokenStore,
    headers: &HeaderMap,
) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    store.resolve(token).await.ok_or(AppError::Unauthorized)
}
