//! HTTP Basic authentication.
//!
//! # Responsibilities
//! - Find the `Authorization` header under either spelling clients use
//! - Split it into scheme and credential token
//! - Compare the decoded `user:pass` with the configured credential
//!
//! # Design Decisions
//! - Fail closed: anything but an exact Basic match is a failure
//! - Only `Basic` is understood; other schemes are reported, not negotiated
//! - Tokens are decoded with the padded standard alphabet; an unpadded
//!   token is an `InvalidEncoding` failure, answered like any other

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::http::headers::HeaderMap;

const AUTHORIZATION_NAMES: &[&str] = &["Authorization", "authorization"];

/// Scheme named by an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// No scheme token at all.
    None,
    Basic,
    Unsupported(String),
}

/// Why a request failed authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("no Authorization header")]
    MissingHeader,

    #[error("Authorization header names no scheme")]
    NoScheme,

    #[error("unsupported authentication mechanism {0:?}")]
    UnsupportedScheme(String),

    #[error("Basic credential is not valid base64")]
    InvalidEncoding,

    #[error("Basic credential does not match")]
    CredentialMismatch,
}

/// Outcome of checking a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Ok,
    Failed(AuthFailure),
}

impl AuthOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, AuthOutcome::Ok)
    }
}

/// Split an `Authorization` value into scheme and credential token.
pub fn parse_auth_line(value: &str) -> (AuthScheme, &str) {
    let value = value.trim();
    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    let scheme = match scheme {
        "" => AuthScheme::None,
        "Basic" => AuthScheme::Basic,
        other => AuthScheme::Unsupported(other.to_string()),
    };
    (scheme, token.trim())
}

/// Validates Basic credentials against one expected `user:pass`.
#[derive(Debug, Clone)]
pub struct BasicAuthValidator {
    expected: Vec<u8>,
}

impl BasicAuthValidator {
    pub fn new(expected_credential: impl Into<String>) -> Self {
        Self {
            expected: expected_credential.into().into_bytes(),
        }
    }

    /// Check the request's `Authorization` (or `authorization`) header.
    pub fn check(&self, headers: &HeaderMap) -> AuthOutcome {
        match headers.get_any(AUTHORIZATION_NAMES) {
            Some(value) => self.validate(value),
            None => AuthOutcome::Failed(AuthFailure::MissingHeader),
        }
    }

    /// Check a raw `Authorization` header value.
    pub fn validate(&self, value: &str) -> AuthOutcome {
        let (scheme, token) = parse_auth_line(value);
        let failure = match scheme {
            AuthScheme::None => AuthFailure::NoScheme,
            AuthScheme::Unsupported(name) => AuthFailure::UnsupportedScheme(name),
            AuthScheme::Basic => match STANDARD.decode(token) {
                Ok(decoded) if decoded == self.expected => return AuthOutcome::Ok,
                Ok(_) => AuthFailure::CredentialMismatch,
                Err(_) => AuthFailure::InvalidEncoding,
            },
        };
        AuthOutcome::Failed(failure)
    }
}
