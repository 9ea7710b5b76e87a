//! HTTP handlers.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::ollama::UpstreamMessage;
use crate::AppState;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// One prior turn as sent by the client. Unknown roles are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Request rejections.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No message provided")]
    MissingMessage,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingMessage => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// System prompt, then user/assistant history, then the new message.
pub fn build_messages(
    system_prompt: &str,
    history: Vec<HistoryEntry>,
    message: String,
) -> Vec<UpstreamMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(UpstreamMessage::new("system", system_prompt));
    messages.extend(
        history
            .into_iter()
            .filter(|entry| matches!(entry.role.as_str(), "user" | "assistant"))
            .map(|entry| UpstreamMessage::new(entry.role, entry.content)),
    );
    messages.push(UpstreamMessage::new("user", message));
    messages
}

/// `POST /chat`: stream the model's reply as plain text.
///
/// Once the response has started, failures are reported in-band as a final
/// `Error: ...` fragment since the status line is already sent.
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatPayload>,
) -> Result<Response, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::MissingMessage);
    }

    info!(
        history = payload.history.len(),
        len = payload.message.len(),
        "Chat request"
    );
    let messages = build_messages(&state.system_prompt, payload.history, payload.message);
    let backend = state.backend.clone();

    let body = async_stream::stream! {
        match backend.stream_chat(messages).await {
            Ok(mut upstream) => {
                while let Some(item) = upstream.next().await {
                    match item {
                        Ok(text) => yield Ok::<_, Infallible>(text),
                        Err(err) => {
                            warn!(error = %err, "Upstream stream failed");
                            yield Ok(format!("Error: {err}"));
                            break;
                        }
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "Upstream request failed");
                yield Ok(format!("Error: {err}"));
            }
        }
    };

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response())
}
