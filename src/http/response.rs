//! Response rendering.
//!
//! # Responsibilities
//! - Wrap a canned payload with status line and headers
//! - Render the Basic auth challenge
//!
//! # Design Decisions
//! - The loop writes configured bytes verbatim; wrapping happens here, on the
//!   caller's side, so tests can also hand-craft broken responses
//! - `Content-Length` is always present so clients finish reading without
//!   waiting for the connection to close

/// A response to render into the bytes the loop sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CannedResponse {
    /// `200 OK` with the given content type.
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    /// SOAP 1.1 reply (`text/xml`).
    pub fn soap(xml: impl Into<Vec<u8>>) -> Self {
        Self::ok("text/xml", xml)
    }

    /// SOAP 1.2 reply (`application/soap+xml`).
    pub fn soap12(xml: impl Into<Vec<u8>>) -> Self {
        Self::ok("application/soap+xml;charset=utf-8", xml)
    }

    /// Custom status with an empty body.
    pub fn status(status: u16, reason: &str) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Render to HTTP/1.1 wire format.
    pub fn render(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason);
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str(&format!("Content-Length: {}\r\n\r\n", self.body.len()));

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Wrap a SOAP 1.1 payload into a complete `200 OK` response.
pub fn make_http_response(xml: &[u8]) -> Vec<u8> {
    CannedResponse::soap(xml).render()
}

/// The `401` sent when Basic credentials are missing or wrong.
pub fn unauthorized_challenge(realm: &str) -> Vec<u8> {
    CannedResponse::status(401, "Authorization Required")
        .with_header("WWW-Authenticate", &format!("Basic realm=\"{realm}\""))
        .render()
}
