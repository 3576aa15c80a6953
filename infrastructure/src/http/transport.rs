//! reqwest-backed [`ChatTransport`].

use super::error::{HttpTransportError, Result};
use super::protocol::{HEALTH_PATH, NORMAL_PATH, STREAM_PATH, UnaryResponse, endpoint_url};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use std::time::Duration;
use streamchat_application::{ByteStream, ChatTransport, HealthStatus, TransportError};
use streamchat_domain::ChatRequest;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("streamchat/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type TransportResult<T> = std::result::Result<T, TransportError>;

/// Chat server client.
///
/// Only connection establishment is bounded; a stream may stay open for as
/// long as the server keeps it open.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Self::with_client(client, base_url)
    }

    /// Use a preconfigured client (proxies, TLS roots, timeouts).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HttpTransportError::InvalidBaseUrl(base_url));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str, request: &ChatRequest) -> TransportResult<reqwest::Response> {
        let url = endpoint_url(&self.base_url, path);
        debug!(
            "POST {} ({} messages, model {})",
            url,
            request.messages.len(),
            request.model
        );
        let response = self
            .client
            .post(&url)
            .json(request)
            .header(
                ACCEPT,
                if path == STREAM_PATH {
                    "text/event-stream"
                } else {
                    "application/json"
                },
            )
            .send()
            .await
            .map_err(HttpTransportError::from)?;
        check_status(response)
    }
}

fn check_status(response: reqwest::Response) -> TransportResult<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        info!("Chat server answered {}", status);
        return Err(TransportError::Status(status.as_u16()));
    }
    Ok(response)
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn open_stream(&self, request: &ChatRequest) -> TransportResult<ByteStream> {
        let response = self.post(STREAM_PATH, request).await?;
        let stream = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| TransportError::Read(e.to_string()))
        });
        Ok(stream.boxed())
    }

    async fn complete(&self, request: &ChatRequest) -> TransportResult<String> {
        let response = self.post(NORMAL_PATH, request).await?;
        let body: UnaryResponse = response.json().await.map_err(HttpTransportError::from)?;
        Ok(body.response)
    }

    async fn health(&self) -> TransportResult<HealthStatus> {
        let url = endpoint_url(&self.base_url, HEALTH_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(HttpTransportError::from)?;
        let response = check_status(response)?;
        Ok(response
            .json::<HealthStatus>()
            .await
            .map_err(HttpTransportError::from)?)
    }
}
