//! Measurement-and-reporting cycle
//!
//! Leaves first: `poll` and `request` helpers, then the supervisor, sampler
//! and reporter components, and the scheduler that drives them.

pub mod output;
pub mod poll;
pub mod reporter;
pub mod request;
pub mod sampler;
pub mod scheduler;
pub mod supervisor;

pub use output::Diagnostics;
pub use poll::BoundedPoll;
pub use reporter::TelemetryReporter;
pub use sampler::LatencySampler;
pub use scheduler::{CycleReport, Monitor, TickOutcome};
pub use supervisor::ConnectionSupervisor;
