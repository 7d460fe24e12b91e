//! [`TlsProvider`] backed by rustls + ring.
//!
//! Enabled by the `tls-rustls` feature.

use std::net::TcpStream;
use std::sync::Arc;

use kiosk_types::error::{KioskError, Result};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, StreamOwned};

use super::{Connection, TlsProvider};

/// Shared, reusable TLS client configuration (one per process).
pub struct RustlsTlsProvider {
    config: Arc<ClientConfig>,
}

impl RustlsTlsProvider {
    /// Build a provider that trusts Mozilla's root CA bundle.
    pub fn new() -> Self {
        let root_store =
            rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for RustlsTlsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsProvider for RustlsTlsProvider {
    fn connect_tls(&self, stream: TcpStream, server_name: &str) -> Result<Box<dyn Connection>> {
        let sni = ServerName::try_from(server_name.to_owned()).map_err(|e| {
            KioskError::Surface(format!("net::ERR_SSL_PROTOCOL_ERROR: invalid server name: {e}"))
        })?;

        let conn = ClientConnection::new(Arc::clone(&self.config), sni).map_err(|e| {
            KioskError::Surface(format!("net::ERR_SSL_PROTOCOL_ERROR: {e}"))
        })?;

        // The handshake runs lazily on the first read/write.
        Ok(Box::new(StreamOwned::new(conn, stream)))
    }
}
