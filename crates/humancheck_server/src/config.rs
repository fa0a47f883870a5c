//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Runtime configuration for the verification service.
///
/// Every field has a default, so an empty TOML file (or no file at all)
/// yields a working configuration.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Board side length for the tic-tac-toe challenge.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// Delay before the oracle's reply is applied, in milliseconds.
    #[serde(default = "default_oracle_delay_ms")]
    oracle_delay_ms: u64,

    /// Quiz time limit in seconds.
    #[serde(default = "default_quiz_time_limit_secs")]
    quiz_time_limit_secs: u64,

    /// Captcha string length.
    #[serde(default = "default_captcha_len")]
    captcha_len: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_board_size() -> usize {
    4
}

fn default_oracle_delay_ms() -> u64 {
    500
}

fn default_quiz_time_limit_secs() -> u64 {
    90
}

fn default_captcha_len() -> usize {
    humancheck_games::challenges::captcha::DEFAULT_LEN
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("failed to parse config: {}", e)))?;

        info!(port = config.port, "config loaded");
        Ok(config)
    }

    /// Applies command-line bind overrides on top of the file values.
    pub fn apply_bind_overrides(&mut self, host: Option<String>, port: Option<u16>) {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
    }

    /// Socket address string this configuration binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            board_size: default_board_size(),
            oracle_delay_ms: default_oracle_delay_ms(),
            quiz_time_limit_secs: default_quiz_time_limit_secs(),
            captcha_len: default_captcha_len(),
        }
    }
}

/// Configuration loading error.
#[derive(Debug, Clone, Display, Error)]
#[display("configuration error: {}", message)]
pub struct ConfigError {
    /// What went wrong.
    message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 3000);
        assert_eq!(*config.board_size(), 4);
        assert_eq!(*config.oracle_delay_ms(), 500);
        assert_eq!(*config.quiz_time_limit_secs(), 90);
        assert_eq!(*config.captcha_len(), 6);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ServerConfig = toml::from_str("port = 8080\nboard_size = 3\n").unwrap();
        assert_eq!(*config.port(), 8080);
        assert_eq!(*config.board_size(), 3);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.oracle_delay_ms(), 500);
    }

    #[test]
    fn test_bind_overrides() {
        let mut config = ServerConfig::default();
        config.apply_bind_overrides(Some("0.0.0.0".to_string()), None);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        config.apply_bind_overrides(None, Some(4000));
        assert_eq!(config.bind_addr(), "0.0.0.0:4000");
    }
}
