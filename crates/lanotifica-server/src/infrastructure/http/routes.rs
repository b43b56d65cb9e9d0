//! Router construction and request handlers.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::auth::require_bearer;
use super::home::render_home_page;
use crate::application::authenticate::AuthGate;
use crate::application::send_notification::{
    NotificationError, NotificationRequest, SendNotificationUseCase,
};
use crate::infrastructure::storage::config::Config;

const INVALID_JSON: &str = "Invalid JSON body";

/// Shared, read-only state for every handler.
#[derive(Clone)]
pub struct HttpState {
    pub notifications: SendNotificationUseCase,
    /// Rendered once at startup.
    pub home_page: Bytes,
}

impl HttpState {
    pub fn new(notifications: SendNotificationUseCase, pairing_png: &[u8]) -> Self {
        Self {
            notifications,
            home_page: Bytes::from(render_home_page(pairing_png)),
        }
    }
}

/// Per-request time limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Limit on reading the request body.
    pub read: Duration,
    /// Limit on producing the whole response.
    pub write: Duration,
}

impl HttpTimeouts {
    pub fn from_config(config: &Config) -> Self {
        Self {
            read: config.read_timeout(),
            write: config.write_timeout(),
        }
    }
}

/// Builds the relay's router.  Only `/notification` sits behind `gate`.
pub fn build_router(gate: AuthGate, state: HttpState, timeouts: HttpTimeouts) -> Router {
    let protected = Router::new()
        .route("/notification", post(notification))
        .route_layer(middleware::from_fn_with_state(gate, require_bearer));

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeouts.write))
                .layer(RequestBodyTimeoutLayer::new(timeouts.read)),
        )
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn home(State(state): State<HttpState>) -> Html<Bytes> {
    Html(state.home_page.clone())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn notification(State(state): State<HttpState>, body: Bytes) -> Response {
    let request: NotificationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!("rejected notification body: {e}");
            return (StatusCode::BAD_REQUEST, INVALID_JSON).into_response();
        }
    };

    match state.notifications.execute(request).await {
        Ok(()) => Json(json!({ "status": "sent" })).into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        let status = match self {
            NotificationError::MissingMessage => StatusCode::BAD_REQUEST,
            NotificationError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
