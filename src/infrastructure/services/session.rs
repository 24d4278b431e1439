//! TCP and TLS sessions over the embassy network stack
//!
//! One session is open at a time, so all socket and record buffers live in
//! a single static block that every session borrows from the connector.

use embassy_net::Stack;
use embassy_net::tcp::TcpSocket;
use embassy_time::{Duration, with_timeout};
use embedded_io_async::{Read, Write};
use embedded_tls::{Aes128GcmSha256, TlsConfig, TlsConnection, TlsContext, UnsecureProvider};
use log::{debug, warn};
use static_cell::ConstStaticCell;

use netspeed_core::{Connector, Endpoint, Session, SessionError, Transport};

use crate::infrastructure::drivers::{EspRng, resolve_host};

const SOCKET_RX_SIZE: usize = 4096;
const SOCKET_TX_SIZE: usize = 1024;
/// Largest TLS record plus header and tag
const TLS_READ_RECORD_SIZE: usize = 16_640;
const TLS_WRITE_RECORD_SIZE: usize = 4096;
/// Decrypted bytes pulled ahead by an availability check
const PENDING_SIZE: usize = 256;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);
const CLOSE_TIMEOUT: Duration = Duration::from_millis(500);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);
/// How long an availability check may wait for TLS data
const AVAILABILITY_WAIT: Duration = Duration::from_millis(1);

struct SessionBuffers {
    rx: [u8; SOCKET_RX_SIZE],
    tx: [u8; SOCKET_TX_SIZE],
    tls_read: [u8; TLS_READ_RECORD_SIZE],
    tls_write: [u8; TLS_WRITE_RECORD_SIZE],
}

impl SessionBuffers {
    const fn new() -> Self {
        Self {
            rx: [0; SOCKET_RX_SIZE],
            tx: [0; SOCKET_TX_SIZE],
            tls_read: [0; TLS_READ_RECORD_SIZE],
            tls_write: [0; TLS_WRITE_RECORD_SIZE],
        }
    }
}

static SESSION_BUFFERS: ConstStaticCell<SessionBuffers> =
    ConstStaticCell::new(SessionBuffers::new());

/// Opens plain TCP and TLS sessions to named hosts
///
/// Server certificates are not verified.
pub struct EspConnector {
    stack: Stack<'static>,
    rng: EspRng,
    buffers: &'static mut SessionBuffers,
}

impl EspConnector {
    /// Must be called once, the session buffers are handed out here
    pub fn new(stack: Stack<'static>, rng: EspRng) -> Self {
        Self {
            stack,
            rng,
            buffers: SESSION_BUFFERS.take(),
        }
    }
}

impl Connector for EspConnector {
    type Session<'s>
        = EspSession<'s>
    where
        Self: 's;

    async fn open(&mut self, endpoint: &Endpoint<'_>) -> Result<Self::Session<'_>, SessionError> {
        let address = resolve_host(self.stack, endpoint.host).await?;

        let SessionBuffers {
            rx,
            tx,
            tls_read,
            tls_write,
        } = &mut *self.buffers;
        let mut socket = TcpSocket::new(self.stack, rx, tx);
        socket.set_timeout(Some(SOCKET_TIMEOUT));

        match with_timeout(CONNECT_TIMEOUT, socket.connect((address, endpoint.port))).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!("session: connect to {}:{} failed: {:?}", endpoint.host, endpoint.port, e);
                socket.abort();
                return Err(SessionError::Connect);
            }
            Err(_) => {
                debug!("session: connect to {}:{} timed out", endpoint.host, endpoint.port);
                socket.abort();
                return Err(SessionError::Connect);
            }
        }

        match endpoint.transport {
            Transport::Plain => Ok(EspSession::Plain(PlainSession {
                socket,
                read_timeout: DEFAULT_READ_TIMEOUT,
            })),
            Transport::Encrypted => {
                let config = TlsConfig::new().with_server_name(endpoint.host);
                let mut tls = TlsConnection::new(socket, tls_read, tls_write);
                let provider = UnsecureProvider::new::<Aes128GcmSha256>(self.rng);
                if let Err(e) = tls.open(TlsContext::new(&config, provider)).await {
                    warn!("session: TLS handshake with {} failed: {:?}", endpoint.host, e);
                    return Err(SessionError::Tls);
                }
                Ok(EspSession::Secure(SecureSession {
                    tls: Some(tls),
                    pending: [0; PENDING_SIZE],
                    pending_start: 0,
                    pending_end: 0,
                    read_timeout: DEFAULT_READ_TIMEOUT,
                }))
            }
        }
    }
}

/// Session handed out by [`EspConnector`]
pub enum EspSession<'s> {
    Plain(PlainSession<'s>),
    Secure(SecureSession<'s>),
}

impl Session for EspSession<'_> {
    async fn send(&mut self, data: &[u8]) -> Result<(), SessionError> {
        match self {
            EspSession::Plain(session) => session.send(data).await,
            EspSession::Secure(session) => session.send(data).await,
        }
    }

    async fn poll_available(&mut self) -> bool {
        match self {
            EspSession::Plain(session) => session.socket.can_recv(),
            EspSession::Secure(session) => session.poll_available().await,
        }
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, SessionError> {
        match self {
            EspSession::Plain(session) => session.read(buf).await,
            EspSession::Secure(session) => session.read(buf).await,
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) {
        match self {
            EspSession::Plain(session) => session.read_timeout = timeout,
            EspSession::Secure(session) => session.read_timeout = timeout,
        }
    }

    async fn close(&mut self) {
        match self {
            EspSession::Plain(session) => close_socket(&mut session.socket).await,
            EspSession::Secure(session) => session.close().await,
        }
    }
}

pub struct PlainSession<'s> {
    socket: TcpSocket<'s>,
    read_timeout: Duration,
}

impl PlainSession<'_> {
    async fn send(&mut self, data: &[u8]) -> Result<(), SessionError> {
        self.socket
            .write_all(data)
            .await
            .map_err(|_| SessionError::Write)?;
        self.socket.flush().await.map_err(|_| SessionError::Write)
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, SessionError> {
        match with_timeout(self.read_timeout, self.socket.read(buf)).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(embassy_net::tcp::Error::ConnectionReset)) => Err(SessionError::Closed),
            Ok(Err(_)) => Err(SessionError::Read),
            Err(_) => Err(SessionError::Timeout),
        }
    }
}

pub struct SecureSession<'s> {
    tls: Option<TlsConnection<'s, TcpSocket<'s>, Aes128GcmSha256>>,
    pending: [u8; PENDING_SIZE],
    pending_start: usize,
    pending_end: usize,
    read_timeout: Duration,
}

impl<'s> SecureSession<'s> {
    fn connection(
        &mut self,
    ) -> Result<&mut TlsConnection<'s, TcpSocket<'s>, Aes128GcmSha256>, SessionError> {
        self.tls.as_mut().ok_or(SessionError::Closed)
    }

    async fn send(&mut self, data: &[u8]) -> Result<(), SessionError> {
        let tls = self.connection()?;
        tls.write_all(data).await.map_err(|e| {
            debug!("session: TLS write: {:?}", e);
            SessionError::Write
        })?;
        tls.flush().await.map_err(|e| {
            debug!("session: TLS flush: {:?}", e);
            SessionError::Write
        })
    }

    /// Decrypted data ready, pulling one record ahead if necessary
    async fn poll_available(&mut self) -> bool {
        if self.pending_start < self.pending_end {
            return true;
        }
        let Some(tls) = self.tls.as_mut() else {
            return false;
        };
        // Each check can stretch the caller's poll interval by up to
        // AVAILABILITY_WAIT. Dropping the read on timeout leaves any partly
        // received record buffered inside the connection, the next read resumes it.
        match with_timeout(AVAILABILITY_WAIT, tls.read(&mut self.pending)).await {
            Ok(Ok(n)) if n > 0 => {
                self.pending_start = 0;
                self.pending_end = n;
                true
            }
            Ok(_) | Err(_) => false,
        }
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, SessionError> {
        if self.pending_start < self.pending_end {
            let n = buf.len().min(self.pending_end - self.pending_start);
            buf[..n].copy_from_slice(&self.pending[self.pending_start..self.pending_start + n]);
            self.pending_start += n;
            return Ok(n);
        }
        let timeout = self.read_timeout;
        let tls = self.connection()?;
        match with_timeout(timeout, tls.read(buf)).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(e)) => {
                debug!("session: TLS read: {:?}", e);
                Err(SessionError::Closed)
            }
            Err(_) => Err(SessionError::Timeout),
        }
    }

    async fn close(&mut self) {
        let Some(tls) = self.tls.take() else {
            return;
        };
        let mut socket = match tls.close().await {
            Ok(socket) => socket,
            Err((socket, e)) => {
                debug!("session: TLS close: {:?}", e);
                socket
            }
        };
        close_socket(&mut socket).await;
    }
}

async fn close_socket(socket: &mut TcpSocket<'_>) {
    socket.close();
    if with_timeout(CLOSE_TIMEOUT, socket.flush()).await.is_err() {
        socket.abort();
    }
}
