//! TLS certificate loading and server-side handshake.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ServerConfig, ServerConnection, StreamOwned};
use thiserror::Error;

use crate::net::connection::{Connection, ConnectionId};
use crate::observability::metrics;

/// Error type for TLS setup and handshakes.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("Certificate file not found: {0:?}")]
    CertificateNotFound(PathBuf),

    #[error("Private key file not found: {0:?}")]
    KeyNotFound(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No certificates found in {0:?}")]
    NoCertificates(PathBuf),

    #[error("No private key found in {0:?}")]
    NoPrivateKey(PathBuf),

    #[error("TLS configuration rejected: {0}")]
    Rustls(#[from] rustls::Error),

    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] io::Error),
}

/// Certificate and key locations, read at every handshake.
#[derive(Debug, Clone)]
pub struct TlsMaterials {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl TlsMaterials {
    pub fn new(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        }
    }

    /// Build a rustls server configuration from the PEM files.
    pub fn load(&self) -> Result<Arc<ServerConfig>, TlsError> {
        load_tls_config(&self.cert_path, &self.key_path)
    }
}

/// Load TLS configuration from certificate and key files.
pub fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<Arc<ServerConfig>, TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::CertificateNotFound(cert_path.to_path_buf()));
    }
    if !key_path.exists() {
        return Err(TlsError::KeyNotFound(key_path.to_path_buf()));
    }

    let mut cert_reader = open_pem(cert_path)?;
    let cert_chain: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut cert_reader)
        .collect::<Result<_, _>>()
        .map_err(|source| TlsError::Read {
            path: cert_path.to_path_buf(),
            source,
        })?;
    if cert_chain.is_empty() {
        return Err(TlsError::NoCertificates(cert_path.to_path_buf()));
    }

    let mut key_reader = open_pem(key_path)?;
    let private_key: PrivateKeyDer<'static> = rustls_pemfile::private_key(&mut key_reader)
        .map_err(|source| TlsError::Read {
            path: key_path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| TlsError::NoPrivateKey(key_path.to_path_buf()))?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(cert_chain, private_key)?;

    Ok(Arc::new(config))
}

fn open_pem(path: &Path) -> Result<BufReader<File>, TlsError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| TlsError::Read {
            path: path.to_path_buf(),
            source,
        })
}

enum TlsState {
    Established(Box<StreamOwned<ServerConnection, TcpStream>>),
    /// Handshake failed; kept only so the socket is released on close.
    Failed(TcpStream),
    Closed,
}

/// Server side of a TLS connection.
///
/// A connection whose handshake failed is still handed to the loop; every
/// read on it fails, which the loop treats like a peer disconnect.
pub struct TlsConnection {
    id: ConnectionId,
    peer: Option<SocketAddr>,
    state: TlsState,
}

impl TlsConnection {
    /// Perform the server handshake on a freshly accepted socket.
    pub fn accept(mut stream: TcpStream, materials: &TlsMaterials, timeout: Duration) -> Self {
        let id = ConnectionId::new();
        let peer = stream.peer_addr().ok();

        let state = match handshake(&mut stream, materials, timeout) {
            Ok(conn) => {
                tracing::debug!(connection_id = %id, peer = ?peer, "TLS handshake complete");
                TlsState::Established(Box::new(StreamOwned::new(conn, stream)))
            }
            Err(e) => {
                tracing::warn!(connection_id = %id, peer = ?peer, error = %e, "TLS handshake failed");
                metrics::record_tls_handshake_failure();
                TlsState::Failed(stream)
            }
        };

        Self { id, peer, state }
    }

    pub fn is_established(&self) -> bool {
        matches!(self.state, TlsState::Established(_))
    }
}

fn handshake(
    stream: &mut TcpStream,
    materials: &TlsMaterials,
    timeout: Duration,
) -> Result<ServerConnection, TlsError> {
    let config = materials.load()?;
    let mut conn = ServerConnection::new(config)?;

    stream.set_read_timeout(Some(timeout)).map_err(TlsError::Handshake)?;
    stream.set_write_timeout(Some(timeout)).map_err(TlsError::Handshake)?;

    while conn.is_handshaking() {
        conn.complete_io(stream).map_err(TlsError::Handshake)?;
    }
    Ok(conn)
}

impl Connection for TlsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    fn read_with_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        match &mut self.state {
            TlsState::Established(stream) => {
                stream.sock.set_read_timeout(Some(timeout))?;
                stream.read(buf)
            }
            TlsState::Failed(_) => Err(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "TLS handshake did not complete",
            )),
            TlsState::Closed => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "connection closed",
            )),
        }
    }

    fn write_with_timeout(&mut self, bytes: &[u8], timeout: Duration) -> io::Result<()> {
        match &mut self.state {
            TlsState::Established(stream) => {
                stream.sock.set_write_timeout(Some(timeout))?;
                stream.write_all(bytes)?;
                stream.flush()
            }
            TlsState::Failed(_) | TlsState::Closed => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "no TLS session",
            )),
        }
    }

    fn close(&mut self) {
        match std::mem::replace(&mut self.state, TlsState::Closed) {
            TlsState::Established(mut stream) => {
                stream.conn.send_close_notify();
                let _ = stream.flush();
                let _ = stream.sock.shutdown(Shutdown::Both);
            }
            TlsState::Failed(stream) => {
                let _ = stream.shutdown(Shutdown::Both);
            }
            TlsState::Closed => return,
        }
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}

impl Drop for TlsConnection {
    fn drop(&mut self) {
        self.close();
    }
}
