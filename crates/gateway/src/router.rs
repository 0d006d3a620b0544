use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::search::route::search_handler;
use crate::state::AppState;
use crate::upload::route::upload_handler;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;

    let cors = if server.enable_cors {
        let origins = server
            .cors_origins
            .iter()
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect::<Vec<_>>();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Same-origin only
        CorsLayer::new()
    };

    let request_timeout = Duration::from_secs(server.request_timeout_secs);
    let body_limit = server.max_upload_bytes;

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/logs/upload", post(upload_handler))
        .route("/logs/search", get(search_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(cors),
        )
        .with_state(state)
}

/// Root handler - shows API info
async fn root_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "Log Reviewer Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "insights": if state.pipeline.extractor().model_name().is_some() { "llm" } else { "heuristic" },
        "search_enabled": state.search.is_some(),
        "endpoints": {
            "upload": "/logs/upload",
            "search": "/logs/search",
            "health": "/health",
            "metrics": "/metrics"
        }
    }))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
