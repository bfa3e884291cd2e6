// Web server - Axum-based scoring API.
//
// Routes:
//   POST /predict  {"content": "..."} -> {"is_toxic": bool, "confidence": f64}
//   GET  /health   liveness probe
//
// The trained pipeline is loaded once by the caller and handed in through
// AppState; handlers only ever read it. CORS is open to any origin so
// browser front-ends can call the API directly.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServeConfig;
use crate::toxicity::traits::ToxicityScorer;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<dyn ToxicityScorer>,
    /// Probability above which text is flagged toxic
    pub threshold: f64,
}

impl AppState {
    pub fn new(scorer: Arc<dyn ToxicityScorer>, threshold: f64) -> Self {
        Self { scorer, threshold }
    }
}

/// Start the Axum server and block until it exits (Ctrl-C stops it).
pub async fn run_server(config: &ServeConfig, state: AppState) -> Result<()> {
    let app = build_router(state, config.debug);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(debug = config.debug, "Toxiscan listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("Server stopped");
    Ok(())
}

/// Build the router. `debug` adds per-request HTTP tracing.
pub fn build_router(state: AppState, debug: bool) -> Router {
    let router = Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/health", get(health))
        .with_state(state);

    let router = if debug {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Health check: always returns 200 OK once the model is loaded.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
