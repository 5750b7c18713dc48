//! Sites and their upload endpoints.

use serde::{Deserialize, Serialize};

/// A site as listed by `GET /api/v1/mysites`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSite {
    pub id: i64,
    pub name: String,
}

/// A selected target site, bound to its material upload endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    pub id: i64,
    pub name: String,
    pub upload_endpoint: String,
}

impl Site {
    /// Bind a listed site to a registry host, deriving the upload endpoint.
    pub fn bind(host: &str, remote: RemoteSite) -> Self {
        let upload_endpoint = format!("{host}/api/v1/sites/{}/materials", remote.id);
        Self {
            id: remote.id,
            name: remote.name,
            upload_endpoint,
        }
    }
}
