pub mod entity;
pub mod ports;
pub mod status;
