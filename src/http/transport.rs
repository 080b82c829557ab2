// Network transport seam

use crate::error::TransportError;
use crate::http::OutgoingRequest;
use crate::version;
use async_trait::async_trait;
use reqwest::StatusCode;

/// Status line and complete body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }
}

/// Sends one request and returns its full response.
///
/// Implementations report connection failures as
/// [`TransportError::Unavailable`]. Cancellation is by dropping the future.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutgoingRequest) -> Result<TransportResponse, TransportError>;
}

/// Transport backed by a shared `reqwest` connection pool
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        // No client-level timeout, the HTTP client arms one per attempt
        let client = reqwest::Client::builder()
            .user_agent(version::user_agent())
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &OutgoingRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
