#![no_std]

//! Netspeed monitor core
//!
//! Hardware-independent part of the netspeed firmware:
//! - `domain` - Measurement entities, connection status and the port traits
//!   the firmware implements (link, sessions, clock, indicator, console)
//! - `app` - Bounded polling, connection supervisor, latency sampler,
//!   telemetry reporter and the cycle scheduler that ties them together
//! - `config` - Targets, credentials and timing of one monitor instance
//!
//! Everything here is generic over the ports, so the whole cycle runs on the
//! host against fakes.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;

pub use app::{
    BoundedPoll, ConnectionSupervisor, CycleReport, Diagnostics, LatencySampler, Monitor,
    TelemetryReporter, TickOutcome,
};
pub use config::{
    MonitorConfig, OutputMode, PollPolicy, ProbeTarget, TelemetryTarget, Timing, WifiCredentials,
};
pub use domain::entity::{BurstSummary, CycleCounters, Observation, ProbeOutcome, Sample, Throughput};
pub use domain::ports::{
    Clock, Connector, Delay, DiagnosticSink, Endpoint, Session, StatusIndicator, Transport,
    WifiLink,
};
pub use domain::status::ConnectionStatus;
pub use error::{LinkError, SessionError};
