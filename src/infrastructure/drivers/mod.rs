mod clock;
mod console;
mod led;
mod network;
mod random;
mod wifi;

pub use clock::EmbassyClock;
pub use console::SerialConsole;
pub use led::StatusLed;
pub use network::init_network_stack;
pub(crate) use network::resolve_host;
pub use random::EspRng;
pub use wifi::EspWifiLink;
