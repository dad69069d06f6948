//! Minimal blocking HTTP client for tests.
//!
//! Each call builds its own client with pooling disabled, so no socket is
//! left open against the single-connection server after the call returns.
//! Certificates are not verified; the server presents a self-signed one.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status, headers and body of a completed GET.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpReply {
    /// First header value matching `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Fetch `url` and return the reply, or the transport error.
pub fn http_get(url: &str) -> Result<HttpReply, reqwest::Error> {
    execute(client()?.get(url))
}

/// Same as [`http_get`] with Basic credentials attached up front.
pub fn http_get_with_basic_auth(
    url: &str,
    user: &str,
    password: &str,
) -> Result<HttpReply, reqwest::Error> {
    execute(client()?.get(url).basic_auth(user, Some(password)))
}

fn client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .danger_accept_invalid_certs(true)
        .pool_max_idle_per_host(0)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

fn execute(request: RequestBuilder) -> Result<HttpReply, reqwest::Error> {
    let response = request.send()?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response.bytes()?.to_vec();
    Ok(HttpReply {
        status,
        headers,
        body,
    })
}
