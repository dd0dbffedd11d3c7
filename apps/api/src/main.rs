mod account;
mod analyzer;
mod auth;
mod config;
mod docstore;
mod errors;
mod interview;
mod llm;
mod pdf;
mod report;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::tokens::AuthTokenStore;
use crate::config::Config;
use crate::docstore::FirestoreClient;
use crate::llm::LlmGateway;
use crate::report::PlainTextRenderer;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Parley API v{}", env!("CARGO_PKG_VERSION"));

    // Text-completion gateway: ordered provider chain from configured keys
    let llm = Arc::new(LlmGateway::from_config(&config));
    if llm.provider_names().is_empty() {
        warn!("No LLM provider configured; interview runs on fixed banks and fallbacks only");
    }

    // Document store: optional Firestore REST shim
    let docstore = match (&config.firebase_project_id, &config.firebase_api_key) {
        (Some(project_id), Some(api_key)) => {
            info!("Document store initialized (project: {project_id})");
            Some(Arc::new(FirestoreClient::new(project_id, api_key.clone())))
        }
        _ => {
            warn!("Firebase credentials missing; auth and profile endpoints disabled");
            None
        }
    };

    let state = AppState {
        llm,
        docstore,
        sessions: SessionStore::new(),
        tokens: AuthTokenStore::new(),
        report_renderer: Arc::new(PlainTextRenderer),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
