//! Chat transport port
//!
//! Defines how the application layer reaches the chat server. The streaming
//! call hands back the raw response body; decoding it is the session's job.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use streamchat_domain::{ChatRequest, RecordReader};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while talking to the chat server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Stream read error: {0}")]
    Read(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Response body of a streaming chat call, in arrival order.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

/// Server liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Transport for chat turns
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Start a streaming turn.
    ///
    /// Fails with [`TransportError::Status`] on a non-success status; in that
    /// case no stream is produced.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, TransportError>;

    /// Run a turn without streaming and return the full response text.
    ///
    /// Default implementation opens a stream and collects it, so transports
    /// without a dedicated endpoint work unchanged.
    async fn complete(&self, request: &ChatRequest) -> Result<String, TransportError> {
        let stream = self.open_stream(request).await?;
        collect_stream_text(stream).await
    }

    /// Check that the server is up.
    async fn health(&self) -> Result<HealthStatus, TransportError>;
}

/// Consume a record stream and concatenate all non-final text.
///
/// Malformed records are skipped with a warning, like the interactive path.
pub async fn collect_stream_text(mut stream: ByteStream) -> Result<String, TransportError> {
    let mut reader = RecordReader::new();
    let mut full_text = String::new();
    while let Some(chunk) = stream.next().await {
        for record in reader.feed(&chunk?) {
            match record {
                Ok(chunk) => {
                    if let Some(text) = chunk.text() {
                        full_text.push_str(text);
                    }
                }
                Err(e) => warn!("Skipping stream record: {}", e),
            }
        }
    }
    let dropped = reader.finish();
    if dropped > 0 {
        warn!("Stream ended inside a character; dropped {} bytes", dropped);
    }
    Ok(full_text)
}
