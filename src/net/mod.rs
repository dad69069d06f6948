//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bounded accept, one at a time)
//!     → tls.rs (optional TLS handshake)
//!     → connection.rs (Connection trait: read/write with timeout, close)
//!     → Hand off to the server loop
//! ```
//!
//! # Design Decisions
//! - Everything is blocking; timeouts are the only bound on waiting
//! - The loop sees `Acceptor` and `Connection`, never a concrete transport
//! - A failed TLS handshake still yields a connection, which fails on first read

pub mod connection;
pub mod listener;
pub mod tls;

pub use connection::{is_timeout, Connection, ConnectionId, PlainConnection};
pub use listener::{Acceptor, Listener, ListenerError};
pub use tls::{load_tls_config, TlsConnection, TlsError, TlsMaterials};
