//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Evaluate the diagnostics environment toggle
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set
//! - The server loop never reads the environment; it is handed a bool

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable that turns on verbose diagnostics.
pub const DIAGNOSTICS_ENV: &str = "SOAP_TEST_SERVER_DEBUG";

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("soap_test_server={level}").into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Whether `SOAP_TEST_SERVER_DEBUG` asks for diagnostics.
pub fn diagnostics_from_env() -> bool {
    std::env::var(DIAGNOSTICS_ENV)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

/// Boolean-like parse: non-zero integers and true/yes/on are true.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    if let Ok(number) = value.parse::<i64>() {
        return number != 0;
    }
    ["true", "yes", "on"]
        .iter()
        .any(|word| value.eq_ignore_ascii_case(word))
}
