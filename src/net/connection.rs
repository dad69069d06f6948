//! Connection abstraction and plain TCP implementation.
//!
//! # Responsibilities
//! - Define the transport capability set the loop relies on
//! - Generate unique connection IDs for tracing
//! - Implement blocking reads/writes with per-call timeouts over TCP

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Global atomic counter for connection IDs.
/// Using relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One accepted client socket, plain or TLS.
///
/// Timeouts are passed per call. A read returning `Ok(0)` means the peer
/// closed its side; `WouldBlock`/`TimedOut` errors mean the timeout elapsed.
pub trait Connection: Send {
    fn id(&self) -> ConnectionId;

    fn peer_addr(&self) -> Option<SocketAddr>;

    fn read_with_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize>;

    /// Write all of `bytes` and flush.
    fn write_with_timeout(&mut self, bytes: &[u8], timeout: Duration) -> io::Result<()>;

    /// Release the socket. Further reads fail.
    fn close(&mut self);
}

/// Whether an I/O error is an elapsed socket timeout.
pub fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Unencrypted TCP connection.
#[derive(Debug)]
pub struct PlainConnection {
    id: ConnectionId,
    peer: Option<SocketAddr>,
    stream: Option<TcpStream>,
}

impl PlainConnection {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            id: ConnectionId::new(),
            peer: stream.peer_addr().ok(),
            stream: Some(stream),
        }
    }

    fn stream(&mut self) -> io::Result<&mut TcpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection closed"))
    }
}

impl Connection for PlainConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    fn read_with_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        let stream = self.stream()?;
        stream.set_read_timeout(Some(timeout))?;
        stream.read(buf)
    }

    fn write_with_timeout(&mut self, bytes: &[u8], timeout: Duration) -> io::Result<()> {
        let stream = self.stream()?;
        stream.set_write_timeout(Some(timeout))?;
        stream.write_all(bytes)?;
        stream.flush()
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            tracing::trace!(connection_id = %self.id, "Connection closed");
        }
    }
}

impl Drop for PlainConnection {
    fn drop(&mut self) {
        self.close();
    }
}
