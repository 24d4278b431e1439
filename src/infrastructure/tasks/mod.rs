mod network;

pub use network::network_runner_task;
