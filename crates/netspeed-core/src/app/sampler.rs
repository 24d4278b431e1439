use heapless::Vec;
use log::{error, warn};

use crate::app::output::Diagnostics;
use crate::app::poll::wait_for_response;
use crate::app::request::{RequestBuf, write_get_request};
use crate::config::{MAX_BURST_LEN, ProbeTarget, Timing};
use crate::domain::entity::{BurstSummary, ProbeOutcome, Sample};
use crate::domain::ports::{Clock, Connector, Delay, DiagnosticSink, Session, StatusIndicator};

/// Times request round-trips against the echo endpoint
pub struct LatencySampler<'a> {
    target: ProbeTarget<'a>,
    timing: Timing,
}

impl<'a> LatencySampler<'a> {
    pub const fn new(target: ProbeTarget<'a>, timing: Timing) -> Self {
        Self { target, timing }
    }

    /// Send one request and wait for the first response bytes
    ///
    /// The response itself is not read. The outcome only tells whether the
    /// endpoint was reachable and answered; timing is up to the caller.
    pub async fn probe<N: Connector, D: Delay>(&self, net: &mut N, delay: &D) -> ProbeOutcome {
        let endpoint = self.target.endpoint();
        let mut session = match net.open(&endpoint).await {
            Ok(session) => session,
            Err(e) => {
                error!("probe: connection to {} failed: {}", self.target.host, e);
                return ProbeOutcome::unreachable();
            }
        };

        let mut request = RequestBuf::new();
        let sent = match write_get_request(&mut request, self.target.host, self.target.path) {
            Ok(()) => session.send(request.as_bytes()).await,
            Err(e) => Err(e),
        };
        if let Err(e) = sent {
            warn!("probe: request to {} failed: {}", self.target.host, e);
            session.close().await;
            return ProbeOutcome::silent();
        }

        let responded = wait_for_response(&mut session, delay, self.timing.response).await;
        if !responded {
            warn!(
                "probe: no response from {} within {} ms",
                self.target.host,
                self.timing.response.budget().as_millis()
            );
        }
        session.close().await;

        if responded {
            ProbeOutcome::answered()
        } else {
            ProbeOutcome::silent()
        }
    }

    /// Run the burst and reduce it to a throughput
    ///
    /// The indicator stays on for the whole burst and blinks off for one
    /// pulse after every probe. Those pulses are subtracted from the total.
    pub async fn run_burst<N, I, C, S>(
        &self,
        net: &mut N,
        led: &mut I,
        clock: &C,
        out: &mut Diagnostics<S>,
    ) -> BurstSummary
    where
        N: Connector,
        I: StatusIndicator,
        C: Clock + Delay,
        S: DiagnosticSink,
    {
        let burst_len = self.timing.probe_count();
        let mut samples = Vec::<Sample, MAX_BURST_LEN>::new();

        let start = clock.uptime_ms();
        led.set(true);
        for n in 1..=burst_len {
            let probe_start = clock.uptime_ms();
            let outcome = self.probe(net, clock).await;
            let elapsed_ms = clock.uptime_ms().saturating_sub(probe_start);
            out.narrate(format_args!("{} ==> {} milliseconds", n, elapsed_ms));
            let _ = samples.push(Sample {
                elapsed_ms,
                outcome,
            });

            led.set(false);
            clock.sleep(self.timing.pulse).await;
            led.set(true);
        }
        let total_ms = clock.uptime_ms().saturating_sub(start);

        let overhead_ms = self.timing.burst_overhead().as_millis();
        let summary = BurstSummary::new(samples, total_ms, overhead_ms);
        if summary.unreachable() > 0 {
            warn!(
                "probe: {} of {} probes could not connect",
                summary.unreachable(),
                burst_len
            );
        }
        summary
    }
}
