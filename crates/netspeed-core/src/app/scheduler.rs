use log::{error, info, warn};

use crate::app::output::Diagnostics;
use crate::app::reporter::TelemetryReporter;
use crate::app::sampler::LatencySampler;
use crate::app::supervisor::ConnectionSupervisor;
use crate::config::MonitorConfig;
use crate::domain::entity::{CycleCounters, Throughput};
use crate::domain::ports::{Clock, Connector, Delay, DiagnosticSink, StatusIndicator, WifiLink};

/// What one scheduler tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Same second as before
    Idle,
    /// New-second edge, heartbeat pulsed
    SecondTick,
    /// A measurement cycle ran and the counters were reset
    CycleCompleted(CycleReport),
}

/// Result of one measurement cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Link was up when the measurement was due (possibly after a reconnect)
    pub connected: bool,
    /// `None` when the cycle was skipped for lack of connectivity
    pub throughput: Option<Throughput>,
    /// Response lines of the telemetry write, `0` when not sent
    pub lines_received: usize,
}

impl CycleReport {
    const fn offline() -> Self {
        Self {
            connected: false,
            throughput: None,
            lines_received: 0,
        }
    }
}

/// Cooperative measurement-and-reporting loop
pub struct Monitor<'a, L, N, I, C, S>
where
    L: WifiLink,
    N: Connector,
    I: StatusIndicator,
    C: Clock + Delay,
    S: DiagnosticSink,
{
    config: MonitorConfig<'a>,
    link: L,
    net: N,
    led: I,
    clock: C,
    out: Diagnostics<S>,
    counters: CycleCounters,
    supervisor: ConnectionSupervisor<'a>,
    sampler: LatencySampler<'a>,
    reporter: TelemetryReporter<'a>,
}

impl<'a, L, N, I, C, S> Monitor<'a, L, N, I, C, S>
where
    L: WifiLink,
    N: Connector,
    I: StatusIndicator,
    C: Clock + Delay,
    S: DiagnosticSink,
{
    pub fn new(config: MonitorConfig<'a>, link: L, net: N, led: I, clock: C, sink: S) -> Self {
        let counters = CycleCounters::new(clock.second_of_minute());
        Self {
            supervisor: ConnectionSupervisor::new(config.wifi, config.timing.association),
            sampler: LatencySampler::new(config.probe, config.timing),
            reporter: TelemetryReporter::new(config.telemetry, config.timing),
            out: Diagnostics::new(sink, config.output),
            config,
            link,
            net,
            led,
            clock,
            counters,
        }
    }

    pub fn counters(&self) -> &CycleCounters {
        &self.counters
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn net(&self) -> &N {
        &self.net
    }

    pub fn led(&self) -> &I {
        &self.led
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn diagnostics(&self) -> &Diagnostics<S> {
        &self.out
    }

    /// Start-up sequence: self-test, scan, first association, table header
    pub async fn start(&mut self) {
        let timing = self.config.timing;
        self.out.line(format_args!("-----------------------"));
        self.out.line(format_args!("--      NetSpeed     --"));
        if !self.config.version.is_empty() {
            self.out.line(format_args!("-- {} --", self.config.version));
        }
        self.out.line(format_args!("-----------------------"));

        self.blink(timing.self_test).await;

        self.link.disconnect().await;
        self.clock.sleep(timing.settle).await;
        self.supervisor.scan_networks(&mut self.link).await;
        self.clock.sleep(timing.settle).await;
        // A failed first attempt is retried by the next cycle
        self.supervisor
            .ensure_connected(&mut self.link, &self.clock)
            .await;
        self.clock.sleep(timing.settle).await;

        self.counters.reset(self.clock.second_of_minute());
        info!("cycle: setup done");
        self.out.table_header();

        self.blink(timing.self_test).await;
    }

    /// One scheduler iteration
    pub async fn tick(&mut self) -> TickOutcome {
        let second = self.clock.second_of_minute();
        let edge = self.counters.observe(second);
        if edge {
            self.blink(self.config.timing.pulse).await;
        }

        if !self.counters.is_due(self.config.timing.cycle_seconds) {
            return if edge {
                TickOutcome::SecondTick
            } else {
                TickOutcome::Idle
            };
        }

        let report = self.run_cycle().await;
        self.counters.reset(self.clock.second_of_minute());
        TickOutcome::CycleCompleted(report)
    }

    /// Start up, then tick forever
    pub async fn run(&mut self) -> ! {
        self.start().await;
        loop {
            self.tick().await;
            self.clock.sleep(self.config.timing.idle).await;
        }
    }

    async fn run_cycle(&mut self) -> CycleReport {
        if !self.link.status().is_connected() {
            error!("cycle: lost WiFi connection, reconnecting");
            if self
                .supervisor
                .ensure_connected(&mut self.link, &self.clock)
                .await
            {
                info!("cycle: WiFi reconnected");
            } else {
                error!("cycle: unable to reconnect");
            }
        }
        if !self.link.status().is_connected() {
            return CycleReport::offline();
        }

        if self.out.is_verbose() {
            match self.link.local_address() {
                Some(address) => self
                    .out
                    .narrate(format_args!("[OK] WiFi connected / IP address: {}", address)),
                None => self.out.narrate(format_args!("[OK] WiFi connected")),
            }
            self.out.narrate(format_args!("-----------------------"));
        }

        let summary = self
            .sampler
            .run_burst(&mut self.net, &mut self.led, &self.clock, &mut self.out)
            .await;

        self.out.narrate(format_args!("-----------------------"));
        self.out
            .narrate(format_args!("==> {} milliseconds total", summary.net_ms));
        match summary.throughput {
            Throughput::Measured(speed) => {
                self.out.narrate(format_args!("==> netspeed: {:4.4}", speed));
            }
            Throughput::Anomalous => {
                self.out.narrate(format_args!("==> netspeed: anomalous"));
            }
        }
        self.out
            .table_row(self.clock.uptime_ms(), summary.throughput);

        let lines_received = match summary.throughput {
            Throughput::Measured(speed) => {
                let observation = self.reporter.observation(speed);
                self.reporter
                    .report(&mut self.net, &self.clock, &mut self.out, &observation)
                    .await
            }
            Throughput::Anomalous => {
                warn!(
                    "cycle: no usable network time ({} ms net, {} of {} answered), report skipped",
                    summary.net_ms,
                    summary.responded(),
                    summary.samples.len()
                );
                0
            }
        };
        self.led.set(false);

        CycleReport {
            connected: true,
            throughput: Some(summary.throughput),
            lines_received,
        }
    }

    async fn blink(&mut self, on_time: embassy_time::Duration) {
        self.led.set(true);
        self.clock.sleep(on_time).await;
        self.led.set(false);
    }
}
