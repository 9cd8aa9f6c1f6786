//! HTTP client for the upstream academic-records service
//!
//! All upstream calls are GETs carrying the session credential as a bearer
//! token, bounded by a per-call timeout. Failures are classified here and
//! surfaced to the fetch layer, never swallowed - the fetchers decide what
//! degrades and what propagates.
//!
//! The [`AcademicApi`] trait is the seam the fetchers depend on, so tests
//! can exercise the full fetch path against a stub without a network.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use stugate_common::Session;
use thiserror::Error;
use tracing::debug;

/// Upstream failure classification
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The call exceeded its timeout
    #[error("upstream call timed out")]
    Timeout,

    /// The upstream rejected the credential (401/403)
    #[error("upstream rejected the credential")]
    Unauthorized,

    /// Connectivity failure before a response arrived
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-success response, or a response body that could not be
    /// read as what its status promised
    #[error("upstream returned status {status}")]
    Server { status: u16 },
}

/// Binary payload returned by the media endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPayload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Outbound interface to the academic-records service
#[async_trait]
pub trait AcademicApi: Send + Sync {
    /// GET a JSON resource
    async fn get_json(
        &self,
        path: &str,
        session: &Session,
        timeout: Duration,
    ) -> Result<Value, UpstreamError>;

    /// GET a binary resource (photos, logos)
    async fn get_bytes(
        &self,
        path: &str,
        session: &Session,
        timeout: Duration,
    ) -> Result<MediaPayload, UpstreamError>;
}

/// Production [`AcademicApi`] over reqwest
pub struct HttpUpstream {
    http_client: Client,
    base_url: String,
}

impl HttpUpstream {
    /// Create the client with a default timeout; individual calls may pass a
    /// longer one for high-latency discovery endpoints
    pub fn new(base_url: impl Into<String>, default_timeout: Duration) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(default_timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn send(
        &self,
        path: &str,
        session: &Session,
        timeout: Duration,
    ) -> Result<reqwest::Response, UpstreamError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "calling upstream");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&session.raw_credential)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(UpstreamError::Unauthorized);
        }
        if !status.is_success() {
            return Err(UpstreamError::Server {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl AcademicApi for HttpUpstream {
    async fn get_json(
        &self,
        path: &str,
        session: &Session,
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        let response = self.send(path, session, timeout).await?;
        let status = response.status().as_u16();

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                // A 2xx with an unreadable body is treated as a server fault
                UpstreamError::Server { status }
            }
        })
    }

    async fn get_bytes(
        &self,
        path: &str,
        session: &Session,
        timeout: Duration,
    ) -> Result<MediaPayload, UpstreamError> {
        let response = self.send(path, session, timeout).await?;
        let status = response.status().as_u16();

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else {
                    UpstreamError::Server { status }
                }
            })?
            .to_vec();

        Ok(MediaPayload {
            content_type,
            bytes,
        })
    }
}

fn classify_transport(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Network(e.to_string())
    }
}
