//! Error types for the sync pipeline.

use crate::upload::ItemFailure;
use thiserror::Error;

/// Sync pipeline error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("token cannot be empty")]
    EmptyCredential,

    #[error("input cancelled")]
    InputCancelled,

    #[error("registry rejected request: {0}")]
    RemoteRejected(String),

    #[error("no sites available for this token")]
    NoSitesAvailable,

    #[error("authentication failed ({status})")]
    AuthFailure {
        status: u16,
        message: Option<String>,
    },

    #[error("material upload failed ({} item(s) rejected)", failures.len())]
    BatchUploadFailed { failures: Vec<ItemFailure> },

    #[error("unexpected response ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("unknown site: {0}")]
    UnknownSite(String),

    #[error("invalid batch size: {size} (must be at least 1)")]
    InvalidBatchSize { size: usize },
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error came from a 401/403 response.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure { .. })
    }
}
