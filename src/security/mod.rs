//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed request headers:
//!     → auth.rs (Basic credential check, only when configured)
//!     → AuthOutcome::Ok       → canned response
//!     → AuthOutcome::Failed   → 401 challenge, same connection
//! ```

pub mod auth;

pub use auth::{parse_auth_line, AuthFailure, AuthOutcome, AuthScheme, BasicAuthValidator};
