//! Fakes for the port traits.
//!
//! Time only moves when a component sleeps, so every poll loop runs
//! instantly and elapsed times are exact.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::net::Ipv4Addr;
use std::rc::Rc;

use embassy_time::Duration;
use netspeed_core::domain::ports::{NetworkList, NetworkName};
use netspeed_core::{
    Clock, ConnectionStatus, Connector, Delay, DiagnosticSink, Endpoint, LinkError,
    MonitorConfig, OutputMode, ProbeTarget, Session, SessionError, StatusIndicator,
    TelemetryTarget, Transport, WifiCredentials, WifiLink,
};

pub const TELEMETRY_HOST: &str = "circusofthings.com";
pub const PROBE_HOST: &str = "httpbin.org";

pub fn config(output: OutputMode) -> MonitorConfig<'static> {
    MonitorConfig::new(
        WifiCredentials::new("test-net", "secret"),
        ProbeTarget::new(PROBE_HOST),
        TelemetryTarget::new(TELEMETRY_HOST, "123456789", "token-abc"),
    )
    .with_output(output)
}

// -----------------------------------------------------------------------------
// Clock
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FakeClock {
    now_ms: Rc<Cell<u64>>,
    sleeps: Rc<Cell<u32>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn uptime(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn sleeps(&self) -> u32 {
        self.sleeps.get()
    }
}

impl Clock for FakeClock {
    fn uptime_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

impl Delay for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
        self.advance(duration.as_millis());
    }
}

// -----------------------------------------------------------------------------
// WiFi link
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCall {
    Disconnect,
    Begin,
    Status,
    Scan,
}

/// Replays `statuses` one per `status()` call, then repeats the last one
#[derive(Debug)]
pub struct FakeLink {
    pub statuses: VecDeque<ConnectionStatus>,
    pub last: ConnectionStatus,
    pub begin_error: Option<LinkError>,
    pub scan_result: Result<Vec<&'static str>, LinkError>,
    pub address: Option<Ipv4Addr>,
    pub calls: Vec<LinkCall>,
}

impl FakeLink {
    pub fn new(statuses: &[ConnectionStatus]) -> Self {
        Self {
            statuses: statuses.iter().copied().collect(),
            last: ConnectionStatus::Unknown,
            begin_error: None,
            scan_result: Ok(Vec::new()),
            address: Some(Ipv4Addr::new(192, 168, 1, 42)),
            calls: Vec::new(),
        }
    }

    pub fn connected() -> Self {
        Self::new(&[ConnectionStatus::Connected])
    }

    pub fn status_polls(&self) -> usize {
        self.calls.iter().filter(|c| **c == LinkCall::Status).count()
    }
}

impl WifiLink for FakeLink {
    async fn disconnect(&mut self) {
        self.calls.push(LinkCall::Disconnect);
    }

    async fn begin(&mut self, _credentials: &WifiCredentials<'_>) -> Result<(), LinkError> {
        self.calls.push(LinkCall::Begin);
        match self.begin_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn status(&mut self) -> ConnectionStatus {
        self.calls.push(LinkCall::Status);
        if let Some(status) = self.statuses.pop_front() {
            self.last = status;
        }
        self.last
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        self.address
    }

    async fn scan(&mut self, networks: &mut NetworkList) -> Result<(), LinkError> {
        self.calls.push(LinkCall::Scan);
        let names = self.scan_result.clone()?;
        for name in names {
            let mut ssid = NetworkName::new();
            let _ = ssid.push_str(name);
            let _ = networks.push(ssid);
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Network sessions
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Peer closes after the last chunk
    Eof,
    /// Peer goes quiet after the last chunk
    Timeout,
}

#[derive(Debug, Clone)]
pub struct SessionScript {
    pub connect_error: Option<SessionError>,
    /// Time until response bytes are available, `None` never
    pub latency_ms: Option<u64>,
    pub chunks: Vec<Vec<u8>>,
    pub end: SessionEnd,
}

impl SessionScript {
    pub fn responding(latency_ms: u64) -> Self {
        Self {
            connect_error: None,
            latency_ms: Some(latency_ms),
            chunks: Vec::new(),
            end: SessionEnd::Eof,
        }
    }

    pub fn refusing() -> Self {
        Self {
            connect_error: Some(SessionError::Connect),
            ..Self::silent()
        }
    }

    pub fn silent() -> Self {
        Self {
            connect_error: None,
            latency_ms: None,
            chunks: Vec::new(),
            end: SessionEnd::Eof,
        }
    }

    /// Deliver `body` in pieces of `chunk` bytes
    pub fn with_body(mut self, body: &[u8], chunk: usize) -> Self {
        self.chunks = body.chunks(chunk).map(<[u8]>::to_vec).collect();
        self
    }

    pub fn ending(mut self, end: SessionEnd) -> Self {
        self.end = end;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub host: String,
    pub port: u16,
    pub transport: Transport,
}

#[derive(Debug, Default)]
pub struct NetLog {
    pub opens: Vec<Opened>,
    pub sent: Vec<String>,
    pub reads: usize,
    pub read_timeouts: Vec<Duration>,
    pub closes: usize,
}

pub struct FakeConnector {
    clock: FakeClock,
    pub plain: SessionScript,
    pub plain_queue: VecDeque<SessionScript>,
    pub encrypted: SessionScript,
    pub log: Rc<RefCell<NetLog>>,
}

impl FakeConnector {
    pub fn new(clock: &FakeClock, plain: SessionScript, encrypted: SessionScript) -> Self {
        Self {
            clock: clock.clone(),
            plain,
            plain_queue: VecDeque::new(),
            encrypted,
            log: Rc::new(RefCell::new(NetLog::default())),
        }
    }

    /// Scripts for the next probes, in order
    pub fn with_probes(mut self, scripts: Vec<SessionScript>) -> Self {
        self.plain_queue = scripts.into();
        self
    }

    pub fn opens(&self, transport: Transport) -> usize {
        self.log
            .borrow()
            .opens
            .iter()
            .filter(|o| o.transport == transport)
            .count()
    }
}

impl Connector for FakeConnector {
    type Session<'s>
        = FakeSession
    where
        Self: 's;

    async fn open(&mut self, endpoint: &Endpoint<'_>) -> Result<Self::Session<'_>, SessionError> {
        self.log.borrow_mut().opens.push(Opened {
            host: endpoint.host.to_string(),
            port: endpoint.port,
            transport: endpoint.transport,
        });
        let script = match endpoint.transport {
            Transport::Plain => self
                .plain_queue
                .pop_front()
                .unwrap_or_else(|| self.plain.clone()),
            Transport::Encrypted => self.encrypted.clone(),
        };
        if let Some(e) = script.connect_error {
            return Err(e);
        }
        Ok(FakeSession {
            opened_at: self.clock.uptime_ms(),
            clock: self.clock.clone(),
            log: self.log.clone(),
            script,
            next_chunk: 0,
        })
    }
}

pub struct FakeSession {
    script: SessionScript,
    opened_at: u64,
    clock: FakeClock,
    log: Rc<RefCell<NetLog>>,
    next_chunk: usize,
}

impl Session for FakeSession {
    async fn send(&mut self, data: &[u8]) -> Result<(), SessionError> {
        self.log
            .borrow_mut()
            .sent
            .push(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    async fn poll_available(&mut self) -> bool {
        match self.script.latency_ms {
            Some(latency) => self.clock.uptime_ms() >= self.opened_at + latency,
            None => false,
        }
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, SessionError> {
        self.log.borrow_mut().reads += 1;
        let Some(chunk) = self.script.chunks.get(self.next_chunk) else {
            return match self.script.end {
                SessionEnd::Eof => Ok(0),
                SessionEnd::Timeout => Err(SessionError::Timeout),
            };
        };
        assert!(chunk.len() <= buf.len(), "test chunk larger than read buffer");
        buf[..chunk.len()].copy_from_slice(chunk);
        self.next_chunk += 1;
        Ok(chunk.len())
    }

    fn set_read_timeout(&mut self, timeout: Duration) {
        self.log.borrow_mut().read_timeouts.push(timeout);
    }

    async fn close(&mut self) {
        self.log.borrow_mut().closes += 1;
    }
}

// -----------------------------------------------------------------------------
// Indicator and console
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecordingLed {
    pub states: Vec<bool>,
}

impl RecordingLed {
    pub fn is_on(&self) -> bool {
        self.states.last().copied().unwrap_or(false)
    }
}

impl StatusIndicator for RecordingLed {
    fn set(&mut self, on: bool) {
        self.states.push(on);
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl DiagnosticSink for RecordingSink {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        self.lines.push(line.to_string());
    }
}

/// HTTP response used by the telemetry fakes: four lines
pub const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nok";
