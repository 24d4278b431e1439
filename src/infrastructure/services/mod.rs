mod session;

pub use session::{EspConnector, EspSession};
