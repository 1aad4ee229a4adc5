//! Internal HTTP surface of the words service.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use stripdex_core::rpc::{ErrorReply, WordsReply};
use stripdex_core::Error;

use crate::normalize::normalize;

/// Build the service router.
pub fn router() -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/norm", get(norm))
}

async fn ping() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct NormParams {
    #[serde(default)]
    phrase: String,
}

async fn norm(Query(params): Query<NormParams>) -> Response {
    match normalize(&params.phrase) {
        Ok(words) => Json(WordsReply { words }).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to normalize phrase");
            reply_error(&err)
        }
    }
}

fn reply_error(err: &Error) -> Response {
    let status = match err {
        Error::BadArgument(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorReply::new(err))).into_response()
}
