//! Client configuration for chatline.
//!
//! Settings are read from a JSON file with serde defaults for every field,
//! then overridden by the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides [`Config::endpoint`].
pub const ENDPOINT_ENV: &str = "CHATLINE_ENDPOINT";

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chatline.json";

/// Main configuration for chatline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Chat endpoint that receives `POST` requests.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Assistant greeting shown when the app starts (`null` disables it).
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,

    /// Terminal width (columns) below which the sidebar collapses.
    #[serde(default = "default_sidebar_breakpoint")]
    pub sidebar_breakpoint: u16,

    /// Color theme name.
    #[serde(default)]
    pub theme: ThemeName,
}

fn default_endpoint() -> String {
    "http://localhost:5000/chat".into()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_greeting() -> Option<String> {
    Some("Hello! I am your professional AI assistant. How can I help you today?".into())
}

fn default_sidebar_breakpoint() -> u16 {
    100
}

/// Available color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    /// Dark theme.
    #[default]
    Mocha,
    /// Light theme.
    Latte,
    /// High contrast theme for accessibility.
    HighContrast,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_secs: default_connect_timeout(),
            greeting: default_greeting(),
            sidebar_breakpoint: default_sidebar_breakpoint(),
            theme: ThemeName::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load from `path` if given, else from [`DEFAULT_CONFIG_FILE`] if it
    /// exists, else defaults. Environment overrides are applied last.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint;
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// JSON parse error.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// JSON serialization error.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://localhost:5000/chat");
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.sidebar_breakpoint, 100);
        assert_eq!(config.theme, ThemeName::Mocha);
        assert!(config.greeting.is_some());
    }

    #[test]
    fn test_config_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("chatline.json");

        let config = Config {
            endpoint: "http://example.test/chat".into(),
            theme: ThemeName::HighContrast,
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("chatline.json");
        std::fs::write(&path, r#"{"greeting": null, "theme": "latte"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.greeting, None);
        assert_eq!(config.theme, ThemeName::Latte);
        assert_eq!(config.endpoint, "http://localhost:5000/chat");
    }

    #[test]
    fn test_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("chatline.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.json");
        assert!(matches!(
            Config::discover(Some(&path)),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| {
            (key == ENDPOINT_ENV).then(|| "http://override.test/chat".to_string())
        });
        assert_eq!(config.endpoint, "http://override.test/chat");
    }

    #[test]
    fn test_blank_env_override_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.endpoint, "http://localhost:5000/chat");
    }
}
