//! Chat server endpoints and response bodies.

use serde::Deserialize;

/// Streaming endpoint: `POST`, answers `text/event-stream`.
pub const STREAM_PATH: &str = "/api/chat/stream";

/// Non-streaming endpoint: `POST`, answers [`UnaryResponse`].
pub const NORMAL_PATH: &str = "/api/chat/normal";

/// Liveness endpoint: `GET`.
pub const HEALTH_PATH: &str = "/api/chat/health";

/// Body of a non-streaming chat response.
#[derive(Debug, Deserialize)]
pub struct UnaryResponse {
    pub response: String,
}

/// Join a base URL and an endpoint path without doubling slashes.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_handles_trailing_slash() {
        assert_eq!(
            endpoint_url("http://localhost:8000/", STREAM_PATH),
            "http://localhost:8000/api/chat/stream"
        );
        assert_eq!(
            endpoint_url("http://localhost:8000", HEALTH_PATH),
            "http://localhost:8000/api/chat/health"
        );
    }

    #[test]
    fn unary_response_parses() {
        let body: UnaryResponse = serde_json::from_str(r#"{"response":"hi"}"#).unwrap();
        assert_eq!(body.response, "hi");
    }
}
