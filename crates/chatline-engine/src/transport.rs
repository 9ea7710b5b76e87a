//! HTTP transport for chat turns.
//!
//! One `POST` per user turn carrying `{message, history}`; the response body
//! is exposed as a lazy stream of decoded text fragments.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, Stream, StreamExt};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::conversation::Turn;
use crate::decode::Utf8Decoder;

/// Request payload for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Latest user text (trimmed).
    pub message: String,
    /// Turns that preceded this message.
    #[serde(default)]
    pub history: Vec<Turn>,
}

/// Streamed reply: finite, non-restartable sequence of text fragments.
pub type TextStream = BoxStream<'static, Result<String, TransportError>>;

/// Something that can carry a chat turn to a backend.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one turn. Resolves once response headers arrive.
    async fn submit(&self, request: &ChatRequest) -> Result<TextStream, TransportError>;
}

/// Transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Endpoint is not a valid URL.
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Request never produced a response.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Server responded with status {0}")]
    Status(StatusCode),

    /// Body read failed mid-stream.
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// [`ChatTransport`] over HTTP using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for the given endpoint URL.
    pub fn new(endpoint: &str, connect_timeout: Duration) -> Result<Self, TransportError> {
        let endpoint = Url::parse(endpoint).map_err(|e| TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self { http, endpoint })
    }

    /// Create a transport from the client configuration.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(
            &config.endpoint,
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn submit(&self, request: &ChatRequest) -> Result<TextStream, TransportError> {
        debug!(
            endpoint = %self.endpoint,
            history_len = request.history.len(),
            "Sending chat request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        Ok(decode_body(response.bytes_stream()))
    }
}

/// Turn a raw body stream into decoded text fragments.
fn decode_body<S>(body: S) -> TextStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut decoder = Utf8Decoder::new();
        futures::pin_mut!(body);

        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => {
                    let text = decoder.decode(&bytes);
                    if !text.is_empty() {
                        yield Ok(text);
                    }
                }
                Err(err) => {
                    yield Err(TransportError::Body(err));
                    return;
                }
            }
        }

        let rest = decoder.finish();
        if !rest.is_empty() {
            yield Ok(rest);
        }
    };

    stream.boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_history() {
        let request = ChatRequest {
            message: "hi".into(),
            history: vec![Turn::assistant("Hello!")],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "hi",
                "history": [{"role": "assistant", "content": "Hello!"}]
            })
        );
    }

    #[test]
    fn test_request_history_defaults_to_empty() {
        let request: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert!(request.history.is_empty());
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = HttpTransport::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TransportError::InvalidEndpoint { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_from_config_uses_endpoint() {
        let config = Config::default();
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.endpoint().as_str(), "http://localhost:5000/chat");
    }

    #[test]
    fn test_status_error_message() {
        let err = TransportError::Status(StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Server responded with status 502 Bad Gateway");
    }
}
