//! Sync sessions: a resolved host plus a validated token.

use crate::error::{Error, Result};

/// Credentials for one sync invocation. Immutable once created and never
/// persisted to disk.
#[derive(Clone, Debug)]
pub struct Session {
    host: String,
    token: String,
}

impl Session {
    /// Create a session, trimming the token and rejecting empty credentials.
    pub fn new(host: impl Into<String>, token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::EmptyCredential);
        }
        Ok(Self {
            host: host.into(),
            token: token.to_string(),
        })
    }

    /// Registry base URL.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Opaque access token.
    pub fn token(&self) -> &str {
        &self.token
    }
}
