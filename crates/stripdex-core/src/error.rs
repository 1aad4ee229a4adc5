//! The shared error taxonomy.
//!
//! Inner layers return these symbolic kinds; transport adapters map them to
//! HTTP statuses at the boundary and back again on the client side, so the
//! taxonomy survives a hop between services.

use thiserror::Error;

/// Result type alias using the shared error taxonomy.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors crossing service boundaries.
#[derive(Error, Debug)]
pub enum Error {
    /// A lookup produced no result.
    #[error("not found")]
    NotFound,

    /// An update run is already in flight.
    #[error("update already running")]
    AlreadyRunning,

    /// Malformed or oversized input.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// Missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// A dependency did not respond.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Everything else.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// Stable wire identifier for this kind, used in internal error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyRunning => "already_running",
            Self::BadArgument(_) => "bad_argument",
            Self::Unauthorized => "unauthorized",
            Self::Unavailable(_) => "unavailable",
            Self::Internal(_) => "internal",
        }
    }

    /// Reconstruct an error from a wire identifier received from a peer.
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "not_found" => Self::NotFound,
            "already_running" => Self::AlreadyRunning,
            "bad_argument" => Self::BadArgument("rejected by peer".to_string()),
            "unauthorized" => Self::Unauthorized,
            "unavailable" => Self::Unavailable("reported by peer".to_string()),
            other => Self::Internal(anyhow::anyhow!("peer error: {other}")),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn is_already_running(&self) -> bool {
        matches!(self, Self::AlreadyRunning)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Internal(err.into())
        }
    }
}
