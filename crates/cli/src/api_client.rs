//! HTTP transport for the Atelier registry API.

use crate::progress::Reporter;
use atelier_core::{BatchPayload, Envelope, Error, ItemFailure, RemoteSite, Result, Session};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Header carrying the access token on every request.
const AUTH_HEADER: &str = "x-auth-token";

/// Thin authenticated client for the registry endpoints.
///
/// No retries: a failed call is terminal for the invocation. 401/403
/// responses emit one auth advisory through the reporter before the error
/// propagates with its original status and remote message.
pub struct ApiClient {
    http: reqwest::Client,
    host: String,
    token: String,
    reporter: Arc<dyn Reporter>,
}

impl ApiClient {
    pub fn new(session: &Session, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: session.host().to_string(),
            token: session.token().to_string(),
            reporter,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Fetch the sites this token may upload to.
    pub async fn my_sites(&self) -> Result<Envelope<Vec<RemoteSite>>> {
        let url = format!("{}/api/v1/mysites", self.host);
        tracing::debug!(%url, "fetching site list");
        let body = self.send(self.http.get(&url)).await?;
        decode(&body)
    }

    /// Upload one batch of materials to a site's upload endpoint.
    pub async fn upload_materials(
        &self,
        endpoint: &str,
        payload: &BatchPayload,
    ) -> Result<Envelope<Vec<ItemFailure>>> {
        tracing::debug!(%endpoint, items = payload.len(), "uploading material batch");
        let body = self.send(self.http.patch(endpoint).json(payload)).await?;
        decode(&body)
    }

    /// Send a request with the auth header and classify the response.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<String> {
        let response = req
            .header(AUTH_HEADER, self.token.as_str())
            .send()
            .await
            .map_err(|err| Error::Network(err.to_string()))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = failure_message(&body);
            self.reporter.auth_advisory(&self.host, message.as_deref());
            return Err(Error::AuthFailure {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|err| Error::Decode(err.to_string()))
}

/// Pull the registry's own message out of a failure envelope body, if the
/// body is one.
fn failure_message(body: &str) -> Option<String> {
    match serde_json::from_str::<Envelope<serde_json::Value>>(body) {
        Ok(Envelope::Failure { message, .. }) => message,
        _ => None,
    }
}
