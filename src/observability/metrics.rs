//! Metrics collection.
//!
//! # Metrics
//! - `soap_server_connections_total` (counter): accepted sockets
//! - `soap_server_requests_total` (counter): parsed requests by outcome
//! - `soap_server_tls_handshake_failures_total` (counter)
//!
//! Nothing is exported from here; the host installs a recorder if it wants
//! the numbers.

use metrics::counter;

pub fn record_connection_accepted() {
    counter!("soap_server_connections_total").increment(1);
}

/// `outcome` is one of `responded`, `auth_challenged`, `terminated`, `rejected`.
pub fn record_request(outcome: &'static str) {
    counter!("soap_server_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_tls_handshake_failure() {
    counter!("soap_server_tls_handshake_failures_total").increment(1);
}
