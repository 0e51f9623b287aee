//! HTTP boundary for the rocket telemetry service.

pub mod api;
pub mod config;

use api::ApiError;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use rocket_state::{InMemoryRocketStore, RocketService};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Aggregation engine and query entry point over the rocket store.
    pub rockets: RocketService,
}

impl AppState {
    /// State backed by a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            rockets: RocketService::new(Arc::new(InMemoryRocketStore::new())),
        }
    }
}

/// Maximum request body size (1 MiB). Telemetry messages are tiny.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe. The store is in memory, so the server is ready as soon
/// as it is serving.
async fn ready() -> StatusCode {
    StatusCode::OK
}

/// Converts a handler panic into a generic 500 response.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(%detail, "request handler panicked");
    ApiError::InternalServerError("unexpected server error".to_string()).into_response()
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/messages", post(api::ingest_message_handler))
        .route("/v1/rockets", get(api::list_rockets_handler))
        .route("/v1/rockets/{id}", get(api::get_rocket_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
        .layer(Extension(Arc::new(state)))
}
