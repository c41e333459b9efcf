//! API route definitions.

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state);

    // Tracing layer with request spans and timing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(handlers::health))
        // Agent-call gateway
        .route("/api/agent", post(handlers::call_agent))
        // Triage data
        .route("/api/history", get(handlers::list_history))
        .route("/api/history/{id}", get(handlers::get_history_entry))
        .route("/api/admin/stats", get(handlers::admin_stats))
        .layer(cors)
        .layer(trace_layer)
        .with_state(state)
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let headers = [header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN];

    let origins: Vec<HeaderValue> = state
        .settings
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("CORS: ignoring invalid origin {origin:?}");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        // No origins configured: allow the local dev front end
        CorsLayer::new()
            .allow_origin([
                "http://localhost:3000".parse::<HeaderValue>().unwrap(),
                "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
            ])
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    }
}
