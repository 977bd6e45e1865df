#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use healthsync_storage::Storage;

mod error;
mod queries;
mod response;
mod sync;

#[cfg(test)]
mod test_support;

pub use error::ApiError;

#[derive(Clone)]
pub struct ApiState {
    storage: Arc<dyn Storage>,
    started_at: Instant,
}

impl ApiState {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            started_at: Instant::now(),
        }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}

pub fn router(state: ApiState) -> Router {
    let health_api = Router::new()
        .route("/sync", post(sync::sync))
        .route("/steps/:user_id", get(queries::steps))
        .route("/workouts/:user_id", get(queries::workouts))
        .route("/stats/:user_id", get(queries::stats));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/health", health_api)
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

async fn root() -> Response {
    Json(serde_json::json!({
        "message": "Health & Fitness API Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "sync": "POST /api/health/sync",
            "steps": "GET /api/health/steps/:userId",
            "workouts": "GET /api/health/workouts/:userId",
            "stats": "GET /api/health/stats/:userId",
        },
    }))
    .into_response()
}

async fn health(State(state): State<ApiState>) -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "uptime": state.started_at.elapsed().as_secs_f64(),
    }))
    .into_response()
}

async fn not_found() -> Response {
    response::error_response(StatusCode::NOT_FOUND, "Endpoint not found", None)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;
    tracing::info!(%method, path, status = response.status().as_u16(), "request");
    response
}

// The mobile client is served from a different origin, so every response
// carries permissive CORS headers and preflight requests short-circuit.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}
