//! HTTP server: the scan trigger and a minimal health endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;

use stance_engine::{CriterionScore, Evaluator, EvidenceRecord};

use crate::config::ServerConfig;

/// Shared request state: just the stateless evaluator.
///
/// Nothing in here is mutable, so handlers share it without locking and
/// concurrent scans cannot observe each other.
#[derive(Debug, Default)]
pub struct AppState {
    /// The evaluation pipeline behind every scan request.
    pub evaluator: Evaluator,
}

impl AppState {
    /// State wrapping the given evaluator.
    #[must_use]
    pub const fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }
}

/// Wire shape of one evaluation result.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    /// Additive trust score in `0..=100`.
    pub trust_score: u8,
    /// Per-criterion points, in rubric order.
    pub breakdown: Vec<CriterionScore>,
    /// The evidence record the score was computed from.
    pub details: EvidenceRecord,
    /// When this evaluation ran (RFC 3339, UTC).
    pub timestamp: DateTime<Utc>,
}

/// Wire shape of the health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
}

/// Build the axum Router (useful for testing).
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scan", post(run_scan))
        .route("/health", get(health_check))
        .with_state(state)
}

/// `POST /scan`: run one posture evaluation and return the result.
///
/// Takes no parameters and has no error response: the engine always
/// produces a result, with degraded hosts visible in the score and the
/// per-probe provenance tags rather than as HTTP failures.
async fn run_scan(State(state): State<Arc<AppState>>) -> Json<ScanResponse> {
    info!("scan requested");

    let result = state.evaluator.evaluate().await;

    Json(ScanResponse {
        trust_score: result.score,
        breakdown: result.breakdown,
        details: result.evidence,
        timestamp: Utc::now(),
    })
}

/// `GET /health`: liveness only, intentionally minimal.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Start the HTTP server with the given configuration and evaluator.
///
/// Binds the listen address and serves until a shutdown signal arrives.
pub async fn run(config: &ServerConfig, evaluator: Evaluator) -> crate::Result<()> {
    let state = Arc::new(AppState::new(evaluator));
    let app = build_router(state);

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|e| crate::SrvError::Server(format!("bind {}: {e}", config.listen)))?;
    info!(addr = %config.listen, "posture evaluation server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| crate::SrvError::Server(e.to_string()))?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("shutdown signal received");
}
