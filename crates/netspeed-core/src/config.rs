//! Monitor configuration
//!
//! All values are const-constructible so the firmware can assemble its
//! configuration at compile time from the build environment.

use embassy_time::Duration;

use crate::domain::ports::{Endpoint, Transport};

/// Credentials of the access point to associate with
#[derive(Debug, Clone, Copy)]
pub struct WifiCredentials<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

impl<'a> WifiCredentials<'a> {
    pub const fn new(ssid: &'a str, password: &'a str) -> Self {
        Self { ssid, password }
    }

    /// Open networks are configured with an empty passphrase
    pub const fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

/// Echo endpoint used for latency probes
#[derive(Debug, Clone, Copy)]
pub struct ProbeTarget<'a> {
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

impl<'a> ProbeTarget<'a> {
    pub const fn new(host: &'a str) -> Self {
        Self {
            host,
            port: 80,
            path: "/get",
        }
    }

    pub const fn endpoint(&self) -> Endpoint<'a> {
        Endpoint::new(self.host, self.port, Transport::Plain)
    }
}

impl Default for ProbeTarget<'_> {
    fn default() -> Self {
        Self::new("httpbin.org")
    }
}

/// Telemetry destination and the signal values are written to
#[derive(Debug, Clone, Copy)]
pub struct TelemetryTarget<'a> {
    pub host: &'a str,
    pub port: u16,
    pub key: &'a str,
    pub token: &'a str,
}

impl<'a> TelemetryTarget<'a> {
    pub const fn new(host: &'a str, key: &'a str, token: &'a str) -> Self {
        Self {
            host,
            port: 443,
            key,
            token,
        }
    }

    pub const fn endpoint(&self) -> Endpoint<'a> {
        Endpoint::new(self.host, self.port, Transport::Encrypted)
    }
}

/// Diagnostic stream layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Narrated multi-line status
    Verbose,
    /// `time speed` table, one line per cycle
    Compact,
}

/// Bounded retry parameters: at most `max_trials` checks, `interval` apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_trials: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub const fn new(max_trials: u32, interval: Duration) -> Self {
        Self {
            max_trials,
            interval,
        }
    }

    /// Upper bound of the time spent sleeping
    pub const fn budget(&self) -> Duration {
        Duration::from_ticks(self.interval.as_ticks() * self.max_trials.saturating_sub(1) as u64)
    }
}

/// Cycle timing
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Second edges between two measurement cycles
    pub cycle_seconds: u32,
    /// Probes per burst
    pub burst_len: usize,
    /// Indicator pulse length (heartbeat and per-probe off-blink)
    pub pulse: Duration,
    /// Indicator on-time of the start-up self-test
    pub self_test: Duration,
    /// Pause between start-up steps
    pub settle: Duration,
    /// Association status polling
    pub association: PollPolicy,
    /// Waiting for the first response bytes
    pub response: PollPolicy,
    /// Per-read timeout while draining a response
    pub line_timeout: Duration,
    /// Sleep between scheduler ticks
    pub idle: Duration,
}

impl Timing {
    pub const fn new() -> Self {
        Self {
            cycle_seconds: 60,
            burst_len: MAX_BURST_LEN,
            pulse: Duration::from_millis(100),
            self_test: Duration::from_secs(1),
            settle: Duration::from_millis(250),
            association: PollPolicy::new(20, Duration::from_millis(500)),
            response: PollPolicy::new(500, Duration::from_millis(10)),
            line_timeout: Duration::from_secs(1),
            idle: Duration::from_millis(20),
        }
    }

    /// Probes actually run per burst, `burst_len` capped at [`MAX_BURST_LEN`]
    pub const fn probe_count(&self) -> usize {
        if self.burst_len < MAX_BURST_LEN {
            self.burst_len
        } else {
            MAX_BURST_LEN
        }
    }

    /// Indicator time included in a burst's total duration, one pulse per probe
    pub const fn burst_overhead(&self) -> Duration {
        Duration::from_ticks(self.pulse.as_ticks() * self.probe_count() as u64)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper bound of probes per burst
pub const MAX_BURST_LEN: usize = 10;

/// Complete configuration of one monitor
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig<'a> {
    pub wifi: WifiCredentials<'a>,
    pub probe: ProbeTarget<'a>,
    pub telemetry: TelemetryTarget<'a>,
    pub output: OutputMode,
    pub timing: Timing,
    /// Shown in the start-up banner
    pub version: &'a str,
}

impl<'a> MonitorConfig<'a> {
    pub const fn new(
        wifi: WifiCredentials<'a>,
        probe: ProbeTarget<'a>,
        telemetry: TelemetryTarget<'a>,
    ) -> Self {
        Self {
            wifi,
            probe,
            telemetry,
            output: OutputMode::Compact,
            timing: Timing::new(),
            version: "",
        }
    }

    #[must_use]
    pub const fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub const fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub const fn with_version(mut self, version: &'a str) -> Self {
        self.version = version;
        self
    }
}
