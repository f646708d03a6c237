//! Server configuration.
//!
//! Configuration is loaded from a YAML file whose path comes from the
//! `RAMPART_CONFIG` environment variable (default `rampart.yaml`). A missing
//! file falls back to built-in defaults so the server can run unconfigured.

use serde::Deserialize;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub session: SessionConfig,
}

/// Listening socket and connection lifecycle settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the listening socket.
    pub ip: String,
    /// Listening port.
    pub port: u16,
    /// Listen backlog passed to the socket.
    pub backlog: u32,
    /// Seconds to wait for bytes from a connected client before giving up.
    pub read_timeout_secs: u64,
    /// Seconds granted to in-flight connections during shutdown.
    pub shutdown_grace_secs: u64,
}

/// Session persistence settings for the store built by the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Either "memory" or "file".
    pub backend: String,
    /// Directory for the file backend.
    pub directory: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "0.0.0.0".to_string(),
            port: 8000,
            backlog: 128,
            read_timeout_secs: 60,
            shutdown_grace_secs: 5,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            directory: "/tmp".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the file named by `RAMPART_CONFIG`
    /// (default `rampart.yaml`), falling back to defaults when the file
    /// does not exist.
    pub fn load() -> Self {
        let path =
            std::env::var("RAMPART_CONFIG").unwrap_or_else(|_| "rampart.yaml".to_string());

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::from_yaml(&contents) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        let cfg = serde_yaml::from_str(contents)?;
        Ok(cfg)
    }

    /// Address string suitable for binding, e.g. `0.0.0.0:8000`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.ip, self.server.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.server.read_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_grace_secs)
    }
}
