//! chatline-server: relay backend for the chatline client
//!
//! Accepts `POST /chat` with `{message, history}`, forwards the conversation
//! to a completion backend (Ollama by default) and streams the reply back as
//! `text/plain`.

pub mod config;
pub mod ollama;
pub mod routes;

use std::io;
use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::ServerConfig;
pub use ollama::{BackendError, CompletionBackend, CompletionStream, OllamaBackend, UpstreamMessage};

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Listener could not be opened.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Accept loop failed.
    #[error("Server error: {0}")]
    Serve(#[source] io::Error),

    /// Upstream client could not be built.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Upstream that produces the reply text.
    pub backend: Arc<dyn CompletionBackend>,
    /// Prepended to every upstream conversation.
    pub system_prompt: Arc<str>,
}

impl AppState {
    /// Create handler state.
    pub fn new(backend: Arc<dyn CompletionBackend>, system_prompt: impl Into<Arc<str>>) -> Self {
        Self {
            backend,
            system_prompt: system_prompt.into(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(routes::chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let backend = OllamaBackend::new(&config.ollama_host, config.model.clone())?;
    info!(
        ollama = %backend.chat_url(),
        model = %backend.model(),
        "Using Ollama backend"
    );
    let state = AppState::new(Arc::new(backend), config.system_prompt);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    info!(addr = %config.bind, "Listening");

    axum::serve(listener, router(state))
        .await
        .map_err(ServerError::Serve)
}
