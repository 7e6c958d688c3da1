//! HTTP Server Configuration
//!
//! Listen address, CORS origins and shutdown grace period.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// `host:port` to bind to (default: "0.0.0.0:8082")
    #[serde(default = "default_address")]
    pub address: String,

    /// CORS allowed origins; empty means any origin (default: [])
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Seconds in-flight requests get to finish after a shutdown signal (default: 5)
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

fn default_address() -> String {
    "0.0.0.0:8082".to_string()
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            cors_origins: Vec::new(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config bound to the given address
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> &str {
        &self.address
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Check the address has a `host:port` shape with a valid port
    pub fn validate(&self) -> Result<(), String> {
        let (host, port) = self
            .address
            .rsplit_once(':')
            .ok_or_else(|| format!("address `{}` must be host:port", self.address))?;

        if host.is_empty() {
            return Err(format!("address `{}` has an empty host", self.address));
        }

        port.parse::<u16>()
            .map_err(|_| format!("address `{}` has an invalid port", self.address))?;

        Ok(())
    }
}
