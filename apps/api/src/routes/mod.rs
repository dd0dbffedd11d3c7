pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::account::handlers as account;
use crate::auth::handlers as auth;
use crate::interview::handlers as interview;
use crate::report::handlers as report;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Auth
        .route("/api/register", post(auth::handle_register))
        .route("/api/login", post(auth::handle_login))
        .route("/api/auth/firebase", post(auth::handle_firebase_auth))
        .route("/api/logout", post(auth::handle_logout))
        // Profile & results
        .route("/api/profile/save", post(account::handle_save_profile))
        .route("/api/profile/get/:user_id", get(account::handle_get_profile))
        .route("/api/results/save", post(account::handle_save_results))
        .route("/api/results/get", get(account::handle_get_results))
        // Report export
        .route("/api/export/report", post(report::handle_export))
        // Interview loop
        .route("/api/upload", post(interview::handle_upload))
        .route("/api/interview/start", post(interview::handle_start))
        .route("/api/interview/answer", post(interview::handle_answer))
        .with_state(state)
}
