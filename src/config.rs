use netspeed_core::{
    MonitorConfig, OutputMode, ProbeTarget, TelemetryTarget, Timing, WifiCredentials,
};

pub(crate) const BUILD_VERSION: &str = env!("BUILD_VERSION");

pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");

pub const TELEMETRY_HOST: &str = match option_env!("TELEMETRY_HOST") {
    Some(host) => host,
    None => "circusofthings.com",
};
pub const TELEMETRY_KEY: &str = env!("TELEMETRY_KEY");
pub const TELEMETRY_TOKEN: &str = env!("TELEMETRY_TOKEN");

pub const PROBE_HOST: &str = match option_env!("PROBE_HOST") {
    Some(host) => host,
    None => "httpbin.org",
};

pub const HOSTNAME: &str = "netspeed-monitor";

#[cfg(feature = "verbose")]
const OUTPUT: OutputMode = OutputMode::Verbose;
#[cfg(not(feature = "verbose"))]
const OUTPUT: OutputMode = OutputMode::Compact;

/// Status LED lights when the pin is low
pub const LED_ACTIVE_LOW: bool = cfg!(feature = "led-active-low");

pub const MONITOR: MonitorConfig<'static> = MonitorConfig::new(
    WifiCredentials::new(WIFI_SSID, WIFI_PASSWORD),
    ProbeTarget::new(PROBE_HOST),
    TelemetryTarget::new(TELEMETRY_HOST, TELEMETRY_KEY, TELEMETRY_TOKEN),
)
.with_output(OUTPUT)
.with_timing(Timing::new())
.with_version(BUILD_VERSION);

#[macro_export]
macro_rules! led_gpio {
    ($p:expr) => {
        $p.GPIO2
    };
}
