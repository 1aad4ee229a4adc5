//! Internal HTTP surface of the search service.
//!
//! An empty result is reported as 404 so the client adapter can surface the
//! symbolic `not_found` to the gateway.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use stripdex_core::rpc::{ComicsReply, ErrorReply};
use stripdex_core::{Comic, Error, Result};

use crate::service::SearchService;

/// Build the service router.
pub fn router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/search", get(search))
        .route("/isearch", get(index_search))
        .with_state(service)
}

async fn ping() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    phrase: String,
    #[serde(default)]
    limit: i64,
}

async fn search(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let result = service.search(&params.phrase, params.limit).await;
    reply_comics(result)
}

async fn index_search(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let result = service.index_search(&params.phrase, params.limit).await;
    reply_comics(result)
}

fn reply_comics(result: Result<Vec<Comic>>) -> Response {
    match result {
        Ok(comics) if comics.is_empty() => reply_error(&Error::NotFound),
        Ok(comics) => Json(ComicsReply {
            total: comics.len(),
            comics,
        })
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "search failed");
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
