//! axum adapter for [`AuthGate`].

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::authenticate::{AuthGate, AuthRejection};

/// Middleware that lets a request through only with a valid bearer token.
///
/// Header bytes that are not UTF-8 are decoded lossily, so they reach the
/// gate and fail as a bad format or token rather than as a missing header.
pub async fn require_bearer(State(gate): State<AuthGate>, req: Request, next: Next) -> Response {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    match gate.check(header.as_deref()) {
        Ok(()) => next.run(req).await,
        Err(rejection) => rejection.into_response(),
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}
