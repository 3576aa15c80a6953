//! Error types for the HTTP adapter

use streamchat_application::TransportError;
use thiserror::Error;

/// Result type alias for HTTP adapter operations
pub type Result<T> = std::result::Result<T, HttpTransportError>;

/// Errors that can occur when talking to the chat server over HTTP
#[derive(Error, Debug)]
pub enum HttpTransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<HttpTransportError> for TransportError {
    fn from(error: HttpTransportError) -> Self {
        match &error {
            HttpTransportError::Request(e) if e.is_decode() => {
                TransportError::InvalidResponse(error.to_string())
            }
            HttpTransportError::Request(e) if e.is_body() => TransportError::Read(error.to_string()),
            _ => TransportError::Connection(error.to_string()),
        }
    }
}
