//! TCP listener with bounded accept.
//!
//! # Responsibilities
//! - Bind to the configured address (port 0 for an ephemeral port)
//! - Accept one connection at a time, giving up after a timeout
//! - Hand accepted sockets over plain or after a TLS handshake

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::{ListenerConfig, TimeoutConfig};
use crate::net::connection::{Connection, PlainConnection};
use crate::net::tls::{TlsConnection, TlsMaterials};
use crate::observability::metrics;

/// How often a pending accept re-checks the listening socket.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Failed to accept connection.
    #[error("Failed to accept: {0}")]
    Accept(#[source] io::Error),
}

/// Source of connections for the server loop.
pub trait Acceptor: Send {
    /// Address clients should connect to.
    fn local_addr(&self) -> SocketAddr;

    /// Wait up to `timeout` for the next client.
    ///
    /// `Ok(None)` means nobody connected in time.
    fn accept_next(&mut self, timeout: Duration) -> Result<Option<Box<dyn Connection>>, ListenerError>;
}

/// Blocking TCP listener, optionally upgrading each socket to TLS.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
    tls: Option<TlsMaterials>,
    handshake_timeout: Duration,
}

impl Listener {
    /// Bind to the configured address.
    pub fn bind(config: &ListenerConfig, timeouts: &TimeoutConfig) -> Result<Self, ListenerError> {
        let bind_error = |source| ListenerError::Bind {
            address: config.bind_address.clone(),
            source,
        };

        let addr: SocketAddr = config
            .bind_address
            .parse()
            .map_err(|e| bind_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

        let inner = TcpListener::bind(addr).map_err(bind_error)?;
        inner.set_nonblocking(true).map_err(bind_error)?;
        let local_addr = inner.local_addr().map_err(bind_error)?;

        let tls = config
            .use_tls
            .then(|| TlsMaterials::new(&config.cert_path, &config.key_path));

        tracing::info!(
            address = %local_addr,
            tls = tls.is_some(),
            "Listener bound"
        );

        Ok(Self {
            inner,
            local_addr,
            tls,
            handshake_timeout: timeouts.read(),
        })
    }

    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    fn wrap(&self, stream: TcpStream, peer: SocketAddr) -> Result<Box<dyn Connection>, ListenerError> {
        // accepted sockets may inherit non-blocking mode on some platforms
        stream.set_nonblocking(false).map_err(ListenerError::Accept)?;
        let _ = stream.set_nodelay(true);
        metrics::record_connection_accepted();

        let conn: Box<dyn Connection> = match &self.tls {
            Some(materials) => Box::new(TlsConnection::accept(stream, materials, self.handshake_timeout)),
            None => Box::new(PlainConnection::new(stream)),
        };

        tracing::debug!(connection_id = %conn.id(), peer_addr = %peer, "Connection accepted");
        Ok(conn)
    }
}

impl Acceptor for Listener {
    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn accept_next(&mut self, timeout: Duration) -> Result<Option<Box<dyn Connection>>, ListenerError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.inner.accept() {
                Ok((stream, peer)) => return self.wrap(stream, peer).map(Some),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(None);
                    }
                    thread::sleep(ACCEPT_POLL_INTERVAL.min(deadline - now));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ListenerError::Accept(e)),
            }
        }
    }
}
