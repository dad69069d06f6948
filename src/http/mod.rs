//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Connection bytes
//!     → request.rs (frame, split header block from body)
//!     → headers.rs (request line and header lines into a HeaderMap)
//!     → soap.rs (SoapAction presence by SOAP version)
//!     → [security/auth.rs: Basic credential check]
//!     → response.rs (canned bytes or 401 challenge)
//!     → Written back by server.rs
//! ```
//!
//! `client.rs` is the test-side counterpart used to reach the server.

pub mod client;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;
pub mod soap;

pub use client::{http_get, http_get_with_basic_auth, HttpReply};
pub use headers::{
    parse_headers, HeaderMap, HeaderParseError, Method, ParsedHeaders, HTTP_VERSION_KEY, PATH_KEY,
};
pub use request::{is_complete, split_request, RequestError, HEADER_SEPARATOR};
pub use response::{make_http_response, unauthorized_challenge, CannedResponse};
pub use server::{
    lock_state, Exchange, ExchangeOutcome, LoopExit, LoopOptions, LoopPhase, ServerError,
    ServerLoop, ServerState, SharedState,
};
pub use soap::{check_soap_action, SoapActionError, SoapVersion};
