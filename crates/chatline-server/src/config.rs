//! Relay server configuration.

use std::net::SocketAddr;

/// Environment variable naming the Ollama base URL.
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

/// Environment variable naming the upstream model.
pub const MODEL_ENV: &str = "CHATLINE_MODEL";

/// System prompt prepended to every upstream conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional AI assistant. \
When asked for code (like Dockerfiles, Python, etc.), ALWAYS format it clearly using Markdown code blocks (```language ... ```). \
Provide the code first, then a brief explanation. \
Keep the response structured and professional.";

/// Settings for the relay server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: SocketAddr,
    /// Ollama base URL.
    pub ollama_host: String,
    /// Model requested from Ollama.
    pub model: String,
    /// System prompt sent ahead of the history.
    pub system_prompt: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            ollama_host: "http://localhost:11434".into(),
            model: "llama3.2:latest".into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
        }
    }
}

impl ServerConfig {
    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(OLLAMA_HOST_ENV).filter(|v| !v.trim().is_empty()) {
            self.ollama_host = host;
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.model = model;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind.port(), 5000);
        assert_eq!(config.ollama_host, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2:latest");
        assert!(config.system_prompt.contains("Markdown code blocks"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config.apply_env_overrides(|key| match key {
            OLLAMA_HOST_ENV => Some("http://gpu-box:11434".into()),
            MODEL_ENV => Some("mistral".into()),
            _ => None,
        });
        assert_eq!(config.ollama_host, "http://gpu-box:11434");
        assert_eq!(config.model, "mistral");
    }
}
