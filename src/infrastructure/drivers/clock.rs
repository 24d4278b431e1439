use embassy_time::{Duration, Instant, Timer};
use netspeed_core::{Clock, Delay};

/// Uptime and sleeps backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn uptime_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

impl Delay for EmbassyClock {
    async fn sleep(&self, duration: Duration) {
        Timer::after(duration).await;
    }
}
