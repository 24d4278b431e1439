use log::{error, warn};

use crate::app::output::Diagnostics;
use crate::app::poll::wait_for_response;
use crate::app::request::{LineCounter, PathBuf, RequestBuf, write_get_request, write_value_path};
use crate::config::{TelemetryTarget, Timing};
use crate::domain::entity::Observation;
use crate::domain::ports::{Connector, Delay, DiagnosticSink, Session};
use crate::error::SessionError;

const READ_CHUNK_SIZE: usize = 128;

/// Writes observations to the telemetry service over TLS
pub struct TelemetryReporter<'a> {
    target: TelemetryTarget<'a>,
    timing: Timing,
}

impl<'a> TelemetryReporter<'a> {
    pub const fn new(target: TelemetryTarget<'a>, timing: Timing) -> Self {
        Self { target, timing }
    }

    /// Observation for the configured signal key
    pub fn observation(&self, value: f64) -> Observation<'a> {
        Observation::new(self.target.key, value)
    }

    /// Send one observation, returns the number of response lines received
    ///
    /// Failures are logged and yield `0`; the observation is not retried.
    pub async fn report<N, D, S>(
        &self,
        net: &mut N,
        delay: &D,
        out: &mut Diagnostics<S>,
        observation: &Observation<'_>,
    ) -> usize
    where
        N: Connector,
        D: Delay,
        S: DiagnosticSink,
    {
        let endpoint = self.target.endpoint();
        out.narrate(format_args!(
            "--> connect to: {}:{}",
            endpoint.host, endpoint.port
        ));
        let mut session = match net.open(&endpoint).await {
            Ok(session) => session,
            Err(e) => {
                error!("telemetry: connection to {} failed: {}", self.target.host, e);
                return 0;
            }
        };

        let lines = match self.exchange(&mut session, delay, out, observation).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!("telemetry: request to {} failed: {}", self.target.host, e);
                0
            }
        };
        session.close().await;

        out.narrate(format_args!("[OK] {} lines received", lines));
        lines
    }

    async fn exchange<T, D, S>(
        &self,
        session: &mut T,
        delay: &D,
        out: &mut Diagnostics<S>,
        observation: &Observation<'_>,
    ) -> Result<usize, SessionError>
    where
        T: Session,
        D: Delay,
        S: DiagnosticSink,
    {
        let mut path = PathBuf::new();
        write_value_path(&mut path, &self.target, observation)?;
        out.narrate(format_args!("Requesting URL: {}{}", self.target.host, path));

        let mut request = RequestBuf::new();
        write_get_request(&mut request, self.target.host, &path)?;
        session.send(request.as_bytes()).await?;

        if !wait_for_response(session, delay, self.timing.response).await {
            warn!(
                "telemetry: no response within {} ms",
                self.timing.response.budget().as_millis()
            );
            return Ok(0);
        }

        session.set_read_timeout(self.timing.line_timeout);
        let mut counter = LineCounter::new();
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match session.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => counter.feed(&chunk[..n], |line| out.narrate(format_args!("{}", line))),
                // Silence past the read timeout ends the response
                Err(SessionError::Timeout | SessionError::Closed) => break,
                Err(e) => {
                    warn!("telemetry: reading response: {}", e);
                    break;
                }
            }
        }
        counter.finish(|line| out.narrate(format_args!("{}", line)));

        Ok(counter.lines())
    }
}
