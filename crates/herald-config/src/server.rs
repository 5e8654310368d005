//! Inbound HTTP listener configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::ConfigError;

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_path() -> String {
    "/api/webhook".to_string()
}

/// Default request body limit (1 MiB).
const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Path that accepts webhook POSTs.
    #[serde(default = "default_path")]
    pub path: String,

    /// Requests with a larger body are refused with 413.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            path: default_path(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] when `bind` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|error| ConfigError::invalid("server.bind", format!("{error}")))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if !self.path.starts_with('/') {
            return Err(ConfigError::invalid("server.path", "must start with '/'"));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::invalid("server.max_body_bytes", "must be non-zero"));
        }
        Ok(())
    }
}
