use core::fmt;

use crate::config::OutputMode;
use crate::domain::entity::Throughput;
use crate::domain::ports::DiagnosticSink;

/// Header of the compact table
pub const TABLE_HEADER: &str = "time speed";

/// Diagnostic stream filtered by the output mode
pub struct Diagnostics<S: DiagnosticSink> {
    sink: S,
    mode: OutputMode,
}

impl<S: DiagnosticSink> Diagnostics<S> {
    pub fn new(sink: S, mode: OutputMode) -> Self {
        Self { sink, mode }
    }

    pub fn is_verbose(&self) -> bool {
        self.mode == OutputMode::Verbose
    }

    /// Written in every mode
    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        self.sink.write_line(args);
    }

    /// Written in verbose mode only
    pub fn narrate(&mut self, args: fmt::Arguments<'_>) {
        if self.is_verbose() {
            self.sink.write_line(args);
        }
    }

    /// One-time table header, compact mode only
    pub fn table_header(&mut self) {
        if !self.is_verbose() {
            self.sink.write_line(format_args!("{}", TABLE_HEADER));
        }
    }

    /// One table row per completed cycle, compact mode only
    pub fn table_row(&mut self, uptime_ms: u64, throughput: Throughput) {
        if self.is_verbose() {
            return;
        }
        let uptime_s = (uptime_ms / 1000) as f64;
        match throughput {
            Throughput::Measured(speed) => {
                self.sink
                    .write_line(format_args!("{:4.2} {:4.2}", uptime_s, speed));
            }
            Throughput::Anomalous => {
                self.sink.write_line(format_args!("{:4.2} nan", uptime_s));
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
