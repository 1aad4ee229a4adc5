//! Internal HTTP surface of the update service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use stripdex_core::rpc::{ErrorReply, StatusReply};
use stripdex_core::Error;

use crate::service::UpdateService;

/// Build the service router.
pub fn router(service: Arc<UpdateService>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/status", get(status))
        .route("/stats", get(stats))
        .route("/update", post(update))
        .route("/db", delete(drop_db))
        .with_state(service)
}

async fn ping() -> StatusCode {
    StatusCode::OK
}

async fn status(State(service): State<Arc<UpdateService>>) -> Response {
    Json(StatusReply {
        status: service.status(),
    })
    .into_response()
}

async fn stats(State(service): State<Arc<UpdateService>>) -> Response {
    match service.stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to collect stats");
            reply_error(&err)
        }
    }
}

async fn update(State(service): State<Arc<UpdateService>>) -> Response {
    match service.update().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "update run failed");
            reply_error(&err)
        }
    }
}

async fn drop_db(State(service): State<Arc<UpdateService>>) -> Response {
    match service.drop_all().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to drop comics");
            reply_error(&err)
        }
    }
}

fn reply_error(err: &Error) -> Response {
    let status = match err {
        Error::NotFound => StatusCode::NOT_FOUND,
        Error::AlreadyRunning => StatusCode::CONFLICT,
        Error::BadArgument(_) => StatusCode::BAD_REQUEST,
        Error::Unauthorized => StatusCode::UNAUTHORIZED,
        Error::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorReply::new(err))).into_response()
}
