//! Infrastructure layer - Port implementations
//!
//! Concrete implementations of the core ports on top of the ESP32 radio,
//! the embassy network stack, the status LED and the serial console.

pub mod drivers;
pub mod services;
pub mod tasks;
