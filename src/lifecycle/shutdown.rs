//! Shutdown sentinel for the server loop.
//!
//! The loop stops cleanly when a request path ends with [`TERMINATE_PATH`].
//! No reply is sent; the requesting client sees the connection close.

use url::Url;

use crate::http::client::http_get;

/// Path suffix that ends the server loop.
pub const TERMINATE_PATH: &str = "terminateThread";

pub fn is_terminate_path(path: &str) -> bool {
    path.ends_with(TERMINATE_PATH)
}

/// URL of the sentinel under `endpoint`.
pub fn terminate_url(endpoint: &Url) -> Url {
    let mut url = endpoint.clone();
    url.set_path(&format!("/{TERMINATE_PATH}"));
    url.set_query(None);
    url
}

/// Send the sentinel GET to `endpoint`.
///
/// The server closes without answering, so a transport error is the
/// expected result and is only logged.
pub fn request_termination(endpoint: &Url) {
    let url = terminate_url(endpoint);
    match http_get(url.as_str()) {
        Ok(reply) => tracing::debug!(status = reply.status, url = %url, "Terminate request answered"),
        Err(e) => tracing::debug!(error = %e, url = %url, "Terminate request closed"),
    }
}
