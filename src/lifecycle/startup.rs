//! Server thread startup.
//!
//! # Responsibilities
//! - Validate configuration before anything is spawned
//! - Bind the listener on a dedicated thread
//! - Block the caller until the port is known
//! - Give the test thread access to what the server received
//!
//! # Design Decisions
//! - Fail fast: invalid config and bind errors surface from `spawn`
//! - Readiness is a one-shot signal carrying the bound address
//! - The thread is detached if the handle is dropped without `join`

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::oneshot;
use url::Url;

use crate::config::{validate_config, ServerConfig};
use crate::http::headers::HeaderMap;
use crate::http::server::{
    lock_state, Exchange, LoopExit, LoopOptions, LoopPhase, ServerError, ServerLoop, ServerState,
    SharedState,
};
use crate::lifecycle::shutdown::request_termination;
use crate::net::Listener;
use crate::observability::diagnostics_from_env;

const THREAD_NAME: &str = "soap-test-server";

/// Handle to a server loop running on its own thread.
///
/// ```no_run
/// use soap_test_server::{make_http_response, ServerConfig, ServerThread};
///
/// let server = ServerThread::spawn(ServerConfig::plain(), make_http_response(b"<Envelope/>"))?;
/// let url = server.endpoint();
/// // ... point the client under test at `url` ...
/// server.terminate()?;
/// # Ok::<(), soap_test_server::ServerError>(())
/// ```
pub struct ServerThread {
    local_addr: SocketAddr,
    tls: bool,
    state: SharedState,
    exchanges: mpsc::Receiver<Exchange>,
    handle: JoinHandle<Result<LoopExit, ServerError>>,
}

impl ServerThread {
    /// Start serving `response` and return once the port is bound.
    ///
    /// Diagnostics are on when the config asks for them or the
    /// `SOAP_TEST_SERVER_DEBUG` variable is truthy.
    pub fn spawn(config: ServerConfig, response: impl Into<Vec<u8>>) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ServerError::InvalidConfig)?;

        let diagnostics = config.observability.diagnostics || diagnostics_from_env();
        let options = LoopOptions::from_config(&config, diagnostics);
        let tls = config.listener.use_tls;
        let state = Arc::new(Mutex::new(ServerState::new(response.into())));

        let (ready_tx, ready_rx) = oneshot::channel();
        let (exchange_tx, exchange_rx) = mpsc::channel();
        let loop_state = Arc::clone(&state);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || -> Result<LoopExit, ServerError> {
                let listener = Listener::bind(&config.listener, &config.timeouts).map_err(|e| {
                    tracing::error!(error = %e, "Server thread failed to bind");
                    e
                })?;
                ServerLoop::with_state(listener, options, loop_state)
                    .with_ready(ready_tx)
                    .with_exchanges(exchange_tx)
                    .run()
            })
            .map_err(ServerError::Spawn)?;

        match ready_rx.blocking_recv() {
            Ok(local_addr) => {
                tracing::debug!(address = %local_addr, tls, "Server thread ready");
                Ok(Self {
                    local_addr,
                    tls,
                    state,
                    exchanges: exchange_rx,
                    handle,
                })
            }
            // The sender was dropped unused, so the thread ended before binding.
            Err(_) => match join_loop(handle) {
                Err(e) => Err(e),
                Ok(_) => Err(ServerError::NotReady),
            },
        }
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /// Root URL clients should use; wildcard binds map to loopback.
    pub fn endpoint(&self) -> Url {
        let mut addr = self.local_addr;
        if addr.ip().is_unspecified() {
            addr.set_ip(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        let scheme = if self.tls { "https" } else { "http" };
        Url::parse(&format!("{scheme}://{addr}/")).expect("socket address forms a valid URL")
    }

    /// `endpoint()` with its path replaced by `path`.
    pub fn url(&self, path: &str) -> Url {
        let mut url = self.endpoint();
        url.set_path(path);
        url
    }

    /// Replace the bytes sent for subsequent requests.
    pub fn set_response(&self, response: impl Into<Vec<u8>>) {
        lock_state(&self.state).pending_response = response.into();
    }

    /// Raw header block of the last request.
    pub fn received_headers(&self) -> Vec<u8> {
        lock_state(&self.state).last_received_headers.clone()
    }

    /// Body of the last request.
    pub fn received_body(&self) -> Vec<u8> {
        lock_state(&self.state).last_received_body.clone()
    }

    /// Parsed headers of the last request.
    pub fn headers(&self) -> HeaderMap {
        lock_state(&self.state).last_headers.clone()
    }

    /// One header of the last request.
    pub fn header(&self, name: &str) -> Option<String> {
        lock_state(&self.state).last_headers.get(name).map(str::to_string)
    }

    pub fn phase(&self) -> LoopPhase {
        lock_state(&self.state).phase
    }

    /// Wait for the oldest exchange not yet taken.
    ///
    /// Exchanges queue in the order they completed, so after several
    /// requests this returns the first one, not the one `headers()` shows.
    /// Use [`drain_exchanges`](Self::drain_exchanges) to catch up.
    pub fn wait_for_exchange(&self, timeout: Duration) -> Option<Exchange> {
        self.exchanges.recv_timeout(timeout).ok()
    }

    /// Take every queued exchange, oldest first, without waiting.
    pub fn drain_exchanges(&self) -> Vec<Exchange> {
        self.exchanges.try_iter().collect()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Send the terminate sentinel and wait for the loop to end.
    ///
    /// Clients must have closed their own connections first; the loop only
    /// accepts a new connection once the current one is gone.
    pub fn terminate(self) -> Result<LoopExit, ServerError> {
        if !self.is_finished() {
            request_termination(&self.endpoint());
        }
        self.join()
    }

    /// Wait for the loop to end on its own.
    pub fn join(self) -> Result<LoopExit, ServerError> {
        join_loop(self.handle)
    }
}

fn join_loop(handle: JoinHandle<Result<LoopExit, ServerError>>) -> Result<LoopExit, ServerError> {
    handle.join().map_err(|_| ServerError::Panicked)?
}
