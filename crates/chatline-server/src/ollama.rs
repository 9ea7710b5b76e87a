//! Streaming completion backend backed by Ollama's `/api/chat`.
//!
//! Ollama answers a streamed chat with newline-delimited JSON objects, one
//! per generated fragment, terminated by an object with `"done": true`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from a completion backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to model server failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model server returned status {0}")]
    Status(StatusCode),

    #[error("Malformed model server response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Model server error: {0}")]
    Upstream(String),
}

/// One message in the upstream conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamMessage {
    pub role: String,
    pub content: String,
}

impl UpstreamMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Stream of generated text fragments.
pub type CompletionStream = BoxStream<'static, Result<String, BackendError>>;

/// A model that can stream a chat completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Start a streamed completion for `messages`.
    async fn stream_chat(
        &self,
        messages: Vec<UpstreamMessage>,
    ) -> Result<CompletionStream, BackendError>;
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<UpstreamMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

/// Client for a local or remote Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    http: reqwest::Client,
    chat_url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(host: &str, model: impl Into<String>) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(BackendError::Client)?;
        Ok(Self {
            http,
            chat_url: format!("{}/api/chat", host.trim_end_matches('/')),
            model: model.into(),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionBackend for OllamaBackend {
    async fn stream_chat(
        &self,
        messages: Vec<UpstreamMessage>,
    ) -> Result<CompletionStream, BackendError> {
        debug!(model = %self.model, messages = messages.len(), "Starting Ollama chat");
        let response = self
            .http
            .post(&self.chat_url)
            .json(&ChatBody {
                model: &self.model,
                messages,
                stream: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        Ok(parse_ndjson(response.bytes_stream()))
    }
}

/// Turn a byte stream of NDJSON chunks into content fragments.
pub(crate) fn parse_ndjson<S>(bytes: S) -> CompletionStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    async_stream::stream! {
        let mut lines = LineBuffer::default();
        futures::pin_mut!(bytes);
        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    yield Err(BackendError::Request(err));
                    return;
                }
            };
            for line in lines.push(&chunk) {
                match parse_line(&line) {
                    Ok(Some(text)) => yield Ok(text),
                    Ok(None) => {}
                    Err(err) => {
                        yield Err(err);
                        return;
                    }
                }
            }
        }
        if let Some(line) = lines.finish() {
            match parse_line(&line) {
                Ok(Some(text)) => yield Ok(text),
                Ok(None) => {}
                Err(err) => yield Err(err),
            }
        }
    }
    .boxed()
}

/// Parse one NDJSON line. Blank lines and empty fragments yield `None`.
fn parse_line(line: &[u8]) -> Result<Option<String>, BackendError> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let chunk: ChatChunk = serde_json::from_slice(line).map_err(BackendError::Decode)?;
    if let Some(error) = chunk.error {
        return Err(BackendError::Upstream(error));
    }
    Ok(chunk
        .message
        .map(|m| m.content)
        .filter(|content| !content.is_empty()))
}

/// Splits an incoming byte stream into complete lines.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            lines.push(line);
        }
        lines
    }

    fn finish(&mut self) -> Option<Vec<u8>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<Bytes, reqwest::Error>> {
        let items: Vec<Result<Bytes, reqwest::Error>> = parts
            .iter()
            .map(|p| Ok(Bytes::from_static(p.as_bytes())))
            .collect();
        stream::iter(items)
    }

    #[test]
    fn test_line_buffer_splits_across_pushes() {
        let mut buffer = LineBuffer::default();
        assert!(buffer.push(b"{\"a\":").is_empty());
        let lines = buffer.push(b"1}\n{\"b\":2}\n{\"c\"");
        assert_eq!(lines, vec![b"{\"a\":1}".to_vec(), b"{\"b\":2}".to_vec()]);
        assert_eq!(buffer.finish(), Some(b"{\"c\"".to_vec()));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_parse_line_content() {
        let line = br#"{"model":"m","message":{"role":"assistant","content":"Hi"},"done":false}"#;
        assert_eq!(parse_line(line).unwrap(), Some("Hi".into()));
    }

    #[test]
    fn test_parse_line_done_is_empty() {
        let line = br#"{"model":"m","message":{"role":"assistant","content":""},"done":true}"#;
        assert_eq!(parse_line(line).unwrap(), None);
        assert_eq!(parse_line(b"   ").unwrap(), None);
    }

    #[test]
    fn test_parse_line_upstream_error() {
        let err = parse_line(br#"{"error":"model not found"}"#).unwrap_err();
        assert!(matches!(err, BackendError::Upstream(ref m) if m == "model not found"));
    }

    #[test]
    fn test_parse_line_garbage() {
        assert!(matches!(
            parse_line(b"not json"),
            Err(BackendError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_parse_ndjson_stream() {
        let body = chunks(&[
            "{\"message\":{\"content\":\"Hel\"}}\n{\"mess",
            "age\":{\"content\":\"lo\"}}\n",
            "{\"message\":{\"content\":\"\"},\"done\":true}",
        ]);
        let fragments: Vec<String> = parse_ndjson(body).map(Result::unwrap).collect().await;
        assert_eq!(fragments, vec!["Hel".to_string(), "lo".to_string()]);
    }

    #[tokio::test]
    async fn test_parse_ndjson_stops_on_error() {
        let body = chunks(&[
            "{\"message\":{\"content\":\"a\"}}\n",
            "{\"error\":\"out of memory\"}\n",
            "{\"message\":{\"content\":\"b\"}}\n",
        ]);
        let items: Vec<_> = parse_ndjson(body).collect().await;
        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(BackendError::Upstream(_))));
    }

    #[test]
    fn test_chat_url_normalized() {
        let backend = OllamaBackend::new("http://localhost:11434/", "llama3.2:latest").unwrap();
        assert_eq!(backend.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(backend.model(), "llama3.2:latest");
    }
}
