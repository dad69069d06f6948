//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the test server.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the test server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Basic authentication settings.
    pub auth: AuthConfig,

    /// Accept/read/write timeouts.
    pub timeouts: TimeoutConfig,

    /// Logging and diagnostics settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    /// Plain TCP, no authentication, ephemeral port.
    pub fn plain() -> Self {
        Self::default()
    }

    /// TLS with the given certificate chain and private key (PEM files).
    pub fn tls(cert_path: impl Into<String>, key_path: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.listener.use_tls = true;
        config.listener.cert_path = cert_path.into();
        config.listener.key_path = key_path.into();
        config
    }

    /// Require HTTP Basic authentication with `user:pass`.
    pub fn with_basic_auth(mut self, credential: impl Into<String>) -> Self {
        self.auth.require_basic_auth = true;
        self.auth.expected_credential = credential.into();
        self
    }

    /// Enable verbose request/response/state logging.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.observability.diagnostics = enabled;
        self
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address. Port 0 picks an ephemeral port.
    pub bind_address: String,

    /// Upgrade every accepted socket to TLS.
    pub use_tls: bool,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:0".to_string(),
            use_tls: false,
            cert_path: "certs/server.pem".to_string(),
            key_path: "certs/server.key".to_string(),
        }
    }
}

/// HTTP Basic authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Challenge every request lacking valid credentials with a 401.
    pub require_basic_auth: bool,

    /// Expected decoded credential, `user:pass`.
    pub expected_credential: String,

    /// Realm advertised in the `WWW-Authenticate` challenge.
    pub realm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            require_basic_auth: false,
            expected_credential: String::new(),
            realm: "soap-test-server".to_string(),
        }
    }
}

/// Timeouts bounding every blocking operation of the loop.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long to wait for a client to connect, in seconds.
    pub accept_secs: u64,

    /// How long to wait for request bytes, in milliseconds.
    pub read_ms: u64,

    /// How long a response write may block, in milliseconds.
    pub write_ms: u64,
}

impl TimeoutConfig {
    pub fn accept(&self) -> Duration {
        Duration::from_secs(self.accept_secs)
    }

    pub fn read(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }

    pub fn write(&self) -> Duration {
        Duration::from_millis(self.write_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            // generous enough for slow CI and valgrind-style runs
            accept_secs: 10,
            read_ms: 2000,
            write_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log every request, response and state transition.
    pub diagnostics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            diagnostics: false,
        }
    }
}
