//! Admission middlewares wired around individual routes.
//!
//! Auth and admission failures reply with fixed strings; internal error text
//! never leaks through these layers.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Semaphore;

use crate::aaa::Aaa;
use crate::rate::RateLimiter;

const TOKEN_PREFIX: &str = "Token ";

/// Require a valid admin token in `Authorization: Token <jwt>`.
pub async fn auth(State(aaa): State<Aaa>, request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match header {
        Some(value) if value.starts_with(TOKEN_PREFIX) => value[TOKEN_PREFIX.len()..].trim(),
        _ => {
            tracing::debug!("missing or malformed authorization header");
            return unauthorized();
        }
    };

    if token.is_empty() || aaa.verify(token).is_err() {
        tracing::debug!("invalid admin token");
        return unauthorized();
    }

    next.run(request).await
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "unauthorized").into_response()
}

/// Cap concurrent requests inside the wrapped handler. Acquisition is
/// non-blocking: a full semaphore rejects immediately with 503.
pub async fn concurrency(
    State(semaphore): State<Arc<Semaphore>>,
    request: Request,
    next: Next,
) -> Response {
    match semaphore.try_acquire() {
        Ok(_permit) => next.run(request).await,
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response(),
    }
}

/// Shared state of the rate middleware. `limiter` is `None` when the
/// configured rate is zero or negative, which disables limiting.
#[derive(Clone)]
pub struct RateState {
    pub limiter: Option<Arc<RateLimiter>>,
    pub timeout: Duration,
}

/// Wait for a token from the shared bucket, bounded by the request timeout.
pub async fn rate(State(state): State<RateState>, request: Request, next: Next) -> Response {
    if let Some(limiter) = &state.limiter {
        if tokio::time::timeout(state.timeout, limiter.wait())
            .await
            .is_err()
        {
            return (StatusCode::INTERNAL_SERVER_ERROR, "rate limit error").into_response();
        }
    }
    next.run(request).await
}
