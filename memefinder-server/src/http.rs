//! Viral Meme Finder HTTP API
//!
//! Each endpoint is a thin axum handler over an inner function that returns
//! `(StatusCode, Value)`, so the logic is testable without axum dispatch.
//!
//! Endpoints:
//! - GET /memes?days_back=1..30&max_memes=1..50: JSON array of meme records
//! - GET /health: liveness, no dependency checks
//! - GET /version: server version info

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use memefinder_core::config::HttpConfig;
use memefinder_core::RunParams;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::finder::MemeFinder;

/// Shared state for all HTTP handlers
pub struct HttpState {
    pub finder: MemeFinder,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/memes", get(memes_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    finder: MemeFinder,
    config: &HttpConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(HttpState { finder });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Viral Meme Finder API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

/// Raw query parameters. Kept as strings so bad input gets our own 400 body
/// instead of axum's plain-text rejection.
#[derive(Debug, Deserialize, Default)]
pub struct MemesQuery {
    pub days_back: Option<String>,
    pub max_memes: Option<String>,
}

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }

    fn into_value(self) -> serde_json::Value {
        serde_json::json!({ "error": self.error, "status": self.status })
    }
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

/// Inner memes: validates parameters, then runs the finder.
pub async fn memes_inner(finder: &MemeFinder, query: MemesQuery) -> (StatusCode, serde_json::Value) {
    let params = match RunParams::from_query(query.days_back.as_deref(), query.max_memes.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            tracing::info!(error = %e, "Rejected /memes request");
            return (StatusCode::BAD_REQUEST, ErrorResponse::new(e.to_string()).into_value());
        }
    };

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!(
        "memes",
        %run_id,
        days_back = params.days_back(),
        max_memes = params.max_memes()
    );

    async move {
        let start = Instant::now();
        let result = finder.find(params).await;
        let took_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(memes) => {
                tracing::info!(records = memes.len(), took_ms, "Served /memes");
                let body: Vec<serde_json::Value> = memes.into_iter().map(|m| m.into_value()).collect();
                (StatusCode::OK, serde_json::Value::Array(body))
            }
            Err(e) => {
                tracing::error!(error = %e, took_ms, "Meme pipeline failed");
                (StatusCode::BAD_GATEWAY, ErrorResponse::new(e.to_string()).into_value())
            }
        }
    }
    .instrument(span)
    .await
}

/// Inner health: fixed liveness payload.
pub fn health_inner() -> serde_json::Value {
    serde_json::json!({ "status": "ok" })
}

/// Inner version: returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": "memefinder",
    })
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

pub async fn memes_handler(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<MemesQuery>,
) -> impl IntoResponse {
    let (status, body) = memes_inner(&state.finder, query).await;
    (status, Json(body))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(health_inner()))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

// ============================================================================
// Unit Tests: call inner functions directly
// ============================================================================
