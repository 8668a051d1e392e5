//! Public HTTP API.
//!
//! Serves the resolve endpoint at `POST /api/download` plus health and
//! Prometheus routes. Runs on WEB_PORT (default 3000).

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Instant;

use crate::core::error::{AppError, AppResult};
use crate::core::metrics;
use crate::download::service::{ResolveRequest, ResolveService};

/// Shared state for the web server.
#[derive(Clone)]
struct WebState {
    service: Arc<ResolveService>,
    start_time: Instant,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

/// Builds the API router around an already constructed service.
pub fn router(service: Arc<ResolveService>) -> Router {
    let state = WebState {
        service,
        start_time: Instant::now(),
    };

    Router::new()
        .route("/api/download", post(resolve_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Start the public web server and run until `shutdown` resolves.
pub async fn start_web_server<F>(port: u16, service: Arc<ResolveService>, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(service);

    log::info!("Starting web server on http://{}", addr);
    log::info!("  POST /api/download - Resolve metadata or a download link");
    log::info!("  GET  /health       - Health check");
    log::info!("  GET  /metrics      - Prometheus metrics");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    log::info!("Web server stopped");
    Ok(())
}

/// Counts a failed request and logs it at a level matching its status.
fn report_failure(err: &AppError) {
    metrics::record_failure(err.kind());
    if err.is_client_error() {
        log::warn!("Resolve request rejected ({}): {}", err.status_code(), err);
    } else {
        log::error!("Resolve request failed ({}): {}", err.status_code(), err);
    }
}

/// POST /api/download: metadata or direct link for a video URL.
async fn resolve_handler(
    State(state): State<WebState>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let err = AppError::InvalidInput("Invalid request body".to_string());
            log::debug!("Rejected request body: {}", rejection.body_text());
            report_failure(&err);
            return err.into_response();
        }
    };

    match state.service.handle(request).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => {
            report_failure(&err);
            err.into_response()
        }
    }
}

/// GET /health: liveness with uptime.
async fn health_handler(State(state): State<WebState>) -> impl IntoResponse {
    let mut status = json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "service": "vidresolve",
        "version": env!("CARGO_PKG_VERSION"),
        "extractor": state.service.source_name(),
    });

    if let Some(cache) = state.service.cache() {
        let stats = cache.stats().await;
        status["cache"] = json!({
            "size": stats.size,
            "hits": stats.hits,
            "misses": stats.misses,
            "hit_rate": stats.hit_rate,
        });
    }

    (StatusCode::OK, Json(status))
}

/// GET /metrics: Prometheus text exposition.
async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    match encoder.encode(&prometheus::gather(), &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            buffer,
        )
            .into_response(),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to encode metrics: {}", e)).into_response()
        }
    }
}
