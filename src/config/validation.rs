//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, address parses)
//! - Check that enabled features carry their material (TLS paths, credential)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before the loop thread is spawned

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.use_tls is set but listener.{0} is empty")]
    MissingTlsMaterial(&'static str),

    #[error("auth.require_basic_auth is set but auth.expected_credential is empty")]
    MissingCredential,

    #[error("auth.expected_credential must have the form `user:pass`")]
    MalformedCredential,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.use_tls {
        if config.listener.cert_path.trim().is_empty() {
            errors.push(ValidationError::MissingTlsMaterial("cert_path"));
        }
        if config.listener.key_path.trim().is_empty() {
            errors.push(ValidationError::MissingTlsMaterial("key_path"));
        }
    }

    if config.auth.require_basic_auth {
        if config.auth.expected_credential.is_empty() {
            errors.push(ValidationError::MissingCredential);
        } else if !config.auth.expected_credential.contains(':') {
            errors.push(ValidationError::MalformedCredential);
        }
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("accept_secs", timeouts.accept_secs),
        ("read_ms", timeouts.read_ms),
        ("write_ms", timeouts.write_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
