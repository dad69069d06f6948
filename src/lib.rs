//! Blocking single-connection HTTP(S) SOAP test server.
//!
//! Serves a fixed response to a SOAP client under test, records what the
//! client sent, and optionally demands HTTP Basic credentials.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;
pub mod xml;

pub use config::schema::ServerConfig;
pub use http::{
    http_get, make_http_response, CannedResponse, Exchange, ExchangeOutcome, HeaderMap, LoopExit,
    ServerError,
};
pub use lifecycle::ServerThread;
pub use xml::{compare_xml, xml_buffer_compare};
