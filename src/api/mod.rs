//! HTTP API over the desk.
//!
//! - health: liveness check
//! - trades: persisted trades, workflows and database stats
//! - dashboard: filtered in-memory views and user actions

pub mod dashboard;
pub mod health;
pub mod trades;

use crate::domain::error::DomainError;
use crate::ConfirmDesk;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub desk: Arc<ConfirmDesk>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(desk: Arc<ConfirmDesk>) -> Self {
        Self {
            desk,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Any failure while serving a request. Always rendered as a 500 with an `error` field.
#[derive(Debug)]
pub struct ApiError(String);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e.to_string())
    }
}

impl<E: std::fmt::Display> From<(&'static str, E)> for ApiError {
    fn from((context, e): (&'static str, E)) -> Self {
        ApiError(format!("{context}: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": self.0 }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn build_router(desk: Arc<ConfirmDesk>) -> Router {
    let state = AppState::new(desk);

    Router::new()
        .merge(health::routes())
        .merge(trades::routes())
        .merge(dashboard::routes())
        .with_state(state)
}

pub async fn run_server(desk: Arc<ConfirmDesk>, addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "API server listening");
    axum::serve(listener, build_router(desk)).await
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    pub(crate) fn desk() -> Arc<ConfirmDesk> {
        Arc::new(ConfirmDesk::open(":memory:", Some(7)).unwrap())
    }

    pub(crate) async fn send(
        router: Router,
        method: &str,
        uri: &str,
        body: Option<String>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = builder.body(body.map(Body::from).unwrap_or_else(Body::empty)).unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }
}
