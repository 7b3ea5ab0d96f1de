//! HTTP server hosting the dispatcher
//!
//! A single route accepts every method; the dispatcher itself rejects
//! anything other than POST so callers get the guidance envelope.

use crate::config::Config;
use crate::dispatch::Dispatcher;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
}

/// Build the router: the configured route, `/` as an alias, and `/health`
///
/// Bodies larger than `max_body_bytes` are answered with a 400 envelope.
pub fn create_routes(dispatcher: Arc<Dispatcher>, route: &str, max_body_bytes: usize) -> Router {
    let state = AppState { dispatcher };

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/", any(handle_blob_request));
    if route != "/" {
        router = router.route(route, any(handle_blob_request));
    }

    router
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { healthy: true })
}

async fn handle_blob_request(
    State(state): State<AppState>,
    method: Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let reply = match body {
        Ok(body) => state.dispatcher.handle(&method, &body).await,
        Err(rejection) => state.dispatcher.reject_unreadable_body(&rejection.body_text()),
    };
    (reply.status, Json(reply.body)).into_response()
}

/// Run the HTTP server until `shutdown` resolves
pub async fn run_http_server<F>(config: &Config, dispatcher: Arc<Dispatcher>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_routes(dispatcher, &config.route, config.max_body_bytes);
    let addr = config.listen_address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {addr}"))?;
    info!(
        addr = %addr,
        route = %config.route,
        max_body_bytes = config.max_body_bytes,
        "HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves on Ctrl-C
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("signal received, shutting down server gracefully");
    }
}
