use heapless::Vec;

use crate::config::MAX_BURST_LEN;

/// Second-edge bookkeeping of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleCounters {
    /// Second-of-minute seen at the last edge
    pub last_second: u8,
    /// Edges since the last completed cycle
    pub minute_ticks: u32,
}

impl CycleCounters {
    pub const fn new(second: u8) -> Self {
        Self {
            last_second: second,
            minute_ticks: 0,
        }
    }

    /// Record the current second, returns `true` on a new-second edge
    pub fn observe(&mut self, second: u8) -> bool {
        if second == self.last_second {
            return false;
        }
        self.last_second = second;
        self.minute_ticks = self.minute_ticks.saturating_add(1);
        true
    }

    pub const fn is_due(&self, cycle_seconds: u32) -> bool {
        self.minute_ticks >= cycle_seconds
    }

    /// Start counting the next cycle from `second`
    pub fn reset(&mut self, second: u8) {
        self.last_second = second;
        self.minute_ticks = 0;
    }
}

/// Result of a single latency probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// The echo endpoint accepted the connection
    pub connected: bool,
    /// Response bytes arrived before the poll budget ran out
    pub responded: bool,
}

impl ProbeOutcome {
    pub const fn unreachable() -> Self {
        Self {
            connected: false,
            responded: false,
        }
    }

    pub const fn silent() -> Self {
        Self {
            connected: true,
            responded: false,
        }
    }

    pub const fn answered() -> Self {
        Self {
            connected: true,
            responded: true,
        }
    }
}

/// One timed probe of a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub elapsed_ms: u64,
    pub outcome: ProbeOutcome,
}

/// Probes per second of network time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Throughput {
    Measured(f64),
    /// No usable network time (zero or negative, or nothing answered)
    Anomalous,
}

impl Throughput {
    /// `probes / (net_ms / 1000)`; anomalous when `net_ms <= 0`
    pub fn from_net_time(probes: usize, net_ms: i64) -> Self {
        if net_ms <= 0 {
            return Throughput::Anomalous;
        }
        Throughput::Measured(probes as f64 / (net_ms as f64 / 1000.0))
    }

    pub const fn value(self) -> Option<f64> {
        match self {
            Throughput::Measured(value) => Some(value),
            Throughput::Anomalous => None,
        }
    }
}

/// Reduction of one burst
#[derive(Debug, Clone, PartialEq)]
pub struct BurstSummary {
    pub samples: Vec<Sample, MAX_BURST_LEN>,
    /// Wall time of the whole burst, indicator pulses included
    pub total_ms: u64,
    /// Wall time minus the fixed indicator overhead
    pub net_ms: i64,
    pub throughput: Throughput,
}

impl BurstSummary {
    pub fn new(samples: Vec<Sample, MAX_BURST_LEN>, total_ms: u64, overhead_ms: u64) -> Self {
        let net_ms = i64::try_from(total_ms)
            .unwrap_or(i64::MAX)
            .saturating_sub(i64::try_from(overhead_ms).unwrap_or(i64::MAX));
        let throughput = if samples.iter().any(|s| s.outcome.responded) {
            Throughput::from_net_time(samples.len(), net_ms)
        } else {
            Throughput::Anomalous
        };
        Self {
            samples,
            total_ms,
            net_ms,
            throughput,
        }
    }

    pub fn responded(&self) -> usize {
        self.samples.iter().filter(|s| s.outcome.responded).count()
    }

    pub fn unreachable(&self) -> usize {
        self.samples.iter().filter(|s| !s.outcome.connected).count()
    }
}

/// Value written to one telemetry signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a> {
    pub key: &'a str,
    pub value: f64,
}

impl<'a> Observation<'a> {
    pub const fn new(key: &'a str, value: f64) -> Self {
        Self { key, value }
    }
}
