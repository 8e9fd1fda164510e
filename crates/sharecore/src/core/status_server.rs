//! JSON status server
//!
//! Small HTTP server running next to the polling loop. It reads the same
//! in-memory stores the handlers write to and serves three endpoints:
//! - `/` - liveness banner with the active user count
//! - `/health` - health check
//! - `/stats` - store sizes and channel configuration

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::error::AppResult;
use crate::storage::{AccessStore, MembershipCache};

/// State shared with the status handlers
#[derive(Clone)]
pub struct StatusState {
    pub store: AccessStore,
    pub membership: MembershipCache,
    pub bot_name: String,
    /// Backup channel username without `@`
    pub backup_channel: String,
    pub database_channel_id: i64,
}

/// Builds the status router. Exposed separately so it can be driven without a socket.
pub fn status_router(state: Arc<StatusState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
}

/// Start the status HTTP server
///
/// # Arguments
/// * `port` - Port to listen on (STATUS_PORT, default 5000)
/// * `state` - Stores and channel settings to report
pub async fn start_status_server(port: u16, state: Arc<StatusState>) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = status_router(state);

    log::info!("Starting status server on http://{}", addr);
    log::info!("  /       - Bot status");
    log::info!("  /health - Health check");
    log::info!("  /stats  - Store statistics");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler(State(state): State<Arc<StatusState>>) -> impl IntoResponse {
    let active_users = state.membership.len().await;
    let body = json!({
        "status": "Bot is active",
        "bot_name": state.bot_name,
        "timestamp": Utc::now().to_rfc3339(),
        "backup_channel": format!("@{}", state.backup_channel),
        "active_users": active_users,
    });

    (StatusCode::OK, Json(body))
}

async fn health_handler() -> impl IntoResponse {
    let body = json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(body))
}

async fn stats_handler(State(state): State<Arc<StatusState>>) -> impl IntoResponse {
    let channel_members = state.membership.len().await;
    let stored_codes = state.store.len().await;
    let body = json!({
        "channel_members": channel_members,
        "stored_codes": stored_codes,
        "backup_channel": state.backup_channel,
        "database_channel_id": state.database_channel_id,
    });

    (StatusCode::OK, Json(body))
}
