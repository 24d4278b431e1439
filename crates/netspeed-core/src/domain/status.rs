/// Station link state as reported by the network stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    NotConnected,
    Idle,
    ScanCompleted,
    Connected,
    ConnectFailed,
    ConnectionLost,
    SsidUnavailable,
    Unknown,
}

impl ConnectionStatus {
    /// Human-readable category
    pub const fn description(self) -> &'static str {
        match self {
            ConnectionStatus::NotConnected => "WiFi disconnected",
            ConnectionStatus::Idle => "WiFi idle status",
            ConnectionStatus::ScanCompleted => "WiFi scan completed",
            ConnectionStatus::Connected => "WiFi connected",
            ConnectionStatus::ConnectFailed => "WiFi connection failed",
            ConnectionStatus::ConnectionLost => "WiFi connection lost",
            ConnectionStatus::SsidUnavailable => "WiFi SSID not available",
            ConnectionStatus::Unknown => "WiFi unknown status",
        }
    }

    pub const fn is_connected(self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// Whether the status is worth an error-level log line
    pub const fn is_error(self) -> bool {
        !matches!(
            self,
            ConnectionStatus::Connected | ConnectionStatus::ScanCompleted
        )
    }
}

impl core::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}
