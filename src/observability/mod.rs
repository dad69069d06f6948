//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! net/, http/, lifecycle/ produce:
//!     → logging.rs (structured log events, diagnostics toggle)
//!     → metrics.rs (counters)
//! ```
//!
//! # Design Decisions
//! - Fatal loop conditions are always logged at error level
//! - Per-request chatter only when diagnostics are enabled

pub mod logging;
pub mod metrics;

pub use logging::{diagnostics_from_env, init_logging, DIAGNOSTICS_ENV};
