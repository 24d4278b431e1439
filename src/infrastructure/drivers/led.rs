use esp_hal::gpio::{Level, Output, OutputConfig, OutputPin};
use netspeed_core::StatusIndicator;

/// On-board status LED on a push-pull GPIO
pub struct StatusLed<'a> {
    pin: Output<'a>,
    active_low: bool,
}

impl<'a> StatusLed<'a> {
    /// Create the driver with the LED switched off
    pub fn new(pin: impl OutputPin + 'a, active_low: bool) -> Self {
        let off = if active_low { Level::High } else { Level::Low };
        Self {
            pin: Output::new(pin, off, OutputConfig::default()),
            active_low,
        }
    }
}

impl StatusIndicator for StatusLed<'_> {
    fn set(&mut self, on: bool) {
        if on != self.active_low {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}
