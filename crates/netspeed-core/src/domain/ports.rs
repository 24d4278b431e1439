//! Port traits implemented by the firmware (and by fakes in tests)
#![allow(async_fn_in_trait)]

use core::fmt;
use core::net::Ipv4Addr;

use embassy_time::Duration;
use heapless::{String, Vec};

use crate::config::WifiCredentials;
use crate::domain::status::ConnectionStatus;
use crate::error::{LinkError, SessionError};

/// Maximum SSID length
pub const MAX_SSID_LEN: usize = 32;

/// Maximum number of networks kept from one scan
pub const MAX_SCAN_RESULTS: usize = 16;

pub type NetworkName = String<MAX_SSID_LEN>;
pub type NetworkList = Vec<NetworkName, MAX_SCAN_RESULTS>;

/// Monotonic time source
pub trait Clock {
    /// Milliseconds since boot
    fn uptime_ms(&self) -> u64;

    /// Seconds part of the current minute
    #[allow(clippy::cast_possible_truncation)]
    fn second_of_minute(&self) -> u8 {
        ((self.uptime_ms() / 1000) % 60) as u8
    }
}

/// Cooperative sleep
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

/// Binary status output (on-board LED)
pub trait StatusIndicator {
    fn set(&mut self, on: bool);
}

/// Line-oriented diagnostic stream
pub trait DiagnosticSink {
    fn write_line(&mut self, line: fmt::Arguments<'_>);
}

/// Station-mode WiFi interface
pub trait WifiLink {
    /// Drop the current association, if any
    async fn disconnect(&mut self);

    /// Start associating with the given access point
    ///
    /// Returns once the request is issued; progress is observed via [`WifiLink::status`].
    async fn begin(&mut self, credentials: &WifiCredentials<'_>) -> Result<(), LinkError>;

    /// Current link state
    fn status(&mut self) -> ConnectionStatus;

    /// Address obtained via DHCP
    fn local_address(&self) -> Option<Ipv4Addr>;

    /// Collect visible network names into `networks`
    async fn scan(&mut self, networks: &mut NetworkList) -> Result<(), LinkError>;
}

/// Session security
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plain,
    Encrypted,
}

/// Remote endpoint of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub host: &'a str,
    pub port: u16,
    pub transport: Transport,
}

impl<'a> Endpoint<'a> {
    pub const fn new(host: &'a str, port: u16, transport: Transport) -> Self {
        Self {
            host,
            port,
            transport,
        }
    }
}

/// An open connection
pub trait Session {
    /// Send the whole buffer
    async fn send(&mut self, data: &[u8]) -> Result<(), SessionError>;

    /// Whether response bytes are ready to be read
    async fn poll_available(&mut self) -> bool;

    /// Read into `buf`, `Ok(0)` once the peer closed the connection
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, SessionError>;

    /// Bound every following [`Session::read`] to `timeout`
    fn set_read_timeout(&mut self, timeout: Duration);

    /// Close the connection, errors are ignored
    async fn close(&mut self);
}

/// Opens sessions to named hosts
pub trait Connector {
    type Session<'s>: Session
    where
        Self: 's;

    async fn open(&mut self, endpoint: &Endpoint<'_>) -> Result<Self::Session<'_>, SessionError>;
}
