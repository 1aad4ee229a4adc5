//! Wire DTOs for the internal service-to-service HTTP surfaces.
//!
//! Error bodies carry the taxonomy's wire identifier so a client adapter can
//! reconstruct the symbolic error on its side of the hop.

use serde::{Deserialize, Serialize};

use crate::{Comic, Error, UpdateStatus};

/// Error body returned by internal services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(err: &Error) -> Self {
        Self {
            error: err.kind().to_string(),
        }
    }
}

/// Reply of the update service's status endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: UpdateStatus,
}

/// Reply of both search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComicsReply {
    pub comics: Vec<Comic>,
    pub total: usize,
}

/// Reply of the words service's normalize endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordsReply {
    pub words: Vec<String>,
}

/// Map a non-success internal response back to a taxonomy error.
///
/// Prefers the `{"error": kind}` body; falls back to the HTTP status when the
/// body is missing or unreadable.
pub async fn error_from_response(resp: reqwest::Response) -> Error {
    let status = resp.status();
    if let Ok(reply) = resp.json::<ErrorReply>().await {
        return Error::from_kind(&reply.error);
    }
    match status.as_u16() {
        404 => Error::NotFound,
        400 => Error::BadArgument("rejected by peer".to_string()),
        401 => Error::Unauthorized,
        409 => Error::AlreadyRunning,
        503 => Error::Unavailable("reported by peer".to_string()),
        code => Error::Internal(anyhow::anyhow!("unexpected status {code}")),
    }
}
