//! HTTP API exposing the fingerprinting engine
//!
//! - `GET /` returns a greeting
//! - `GET /check_fingerprint?targets=a&targets=b`
//! - `POST /check_fingerprint` with `{"targets": ["a", "b"]}`
//!
//! Both check forms answer with a JSON array aligned with the targets.
//! Failing targets come back as empty arrays, never as an error status.

use anyhow::{Context, Result};
use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use favscan_common::FingerprintResult;
use favscan_orchestrator::Orchestrator;

pub const GREETING: &str = "Hello, visitor!";

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<Orchestrator>,
}

#[derive(Debug, Deserialize)]
struct CheckRequest {
    targets: Vec<String>,
}

pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/check_fingerprint", get(check_get).post(check_post))
        .with_state(AppState { orchestrator })
}

pub async fn serve(orchestrator: Arc<Orchestrator>, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

async fn index() -> &'static str {
    GREETING
}

/// Every `targets` value from a query string, repeated keys included.
fn query_targets(query: Option<&str>) -> Vec<String> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .filter(|(key, _)| key == "targets")
                .map(|(_, value)| value.into_owned())
                .collect()
        })
        .unwrap_or_default()
}

async fn check_get(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<Vec<FingerprintResult>> {
    let targets = query_targets(query.as_deref());
    Json(state.orchestrator.fingerprint_all(targets).await)
}

async fn check_post(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Json<Vec<FingerprintResult>> {
    Json(state.orchestrator.fingerprint_all(request.targets).await)
}
