use core::net::Ipv4Addr;

use embassy_net::Stack;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, ScanConfig, WifiController, WifiStaState,
};
use log::{debug, warn};

use netspeed_core::domain::ports::{NetworkList, NetworkName};
use netspeed_core::{ConnectionStatus, LinkError, WifiCredentials, WifiLink};

/// Station-mode link on the ESP32 radio
///
/// The radio only reports started, connected or disconnected. The finer
/// statuses are derived from what this link did last: a failed connect
/// request, a scan without the target SSID, or a drop after being connected.
pub struct EspWifiLink {
    controller: WifiController<'static>,
    stack: Stack<'static>,
    ssid: NetworkName,
    was_connected: bool,
    connect_failed: bool,
    ssid_missing: bool,
    scan_done: bool,
}

impl EspWifiLink {
    /// `ssid` is the network scans look for
    pub fn new(controller: WifiController<'static>, stack: Stack<'static>, ssid: &str) -> Self {
        let mut expected = NetworkName::new();
        let _ = expected.push_str(ssid);
        Self {
            controller,
            stack,
            ssid: expected,
            was_connected: false,
            connect_failed: false,
            ssid_missing: false,
            scan_done: false,
        }
    }

    fn is_started(&self) -> bool {
        matches!(self.controller.is_started(), Ok(true))
    }

    async fn start(&mut self, client_config: ClientConfig) -> Result<(), LinkError> {
        let mode_config = ModeConfig::Client(client_config);
        self.controller.set_config(&mode_config).map_err(|e| {
            warn!("wifi: rejected station config: {:?}", e);
            LinkError::Config
        })?;
        if !self.is_started() {
            self.controller.start_async().await.map_err(|e| {
                warn!("wifi: start failed: {:?}", e);
                LinkError::Start
            })?;
        }
        Ok(())
    }
}

impl WifiLink for EspWifiLink {
    async fn disconnect(&mut self) {
        if self.is_started() {
            if let Err(e) = self.controller.disconnect_async().await {
                debug!("wifi: disconnect: {:?}", e);
            }
        }
        self.was_connected = false;
    }

    async fn begin(&mut self, credentials: &WifiCredentials<'_>) -> Result<(), LinkError> {
        let client_config = if credentials.is_open() {
            ClientConfig::default()
                .with_ssid(credentials.ssid.into())
                .with_auth_method(AuthMethod::None)
        } else {
            ClientConfig::default()
                .with_ssid(credentials.ssid.into())
                .with_password(credentials.password.into())
        };
        self.start(client_config).await?;

        self.ssid.clear();
        let _ = self.ssid.push_str(credentials.ssid);
        self.connect_failed = false;
        self.scan_done = false;

        if let Err(e) = self.controller.connect() {
            warn!("wifi: connect request failed: {:?}", e);
            self.connect_failed = true;
            return Err(LinkError::Connect);
        }
        Ok(())
    }

    fn status(&mut self) -> ConnectionStatus {
        let status = match esp_radio::wifi::sta_state() {
            WifiStaState::Connected if self.stack.config_v4().is_some() => {
                ConnectionStatus::Connected
            }
            // Associated, DHCP still pending
            WifiStaState::Connected => ConnectionStatus::Idle,
            WifiStaState::Disconnected if self.was_connected => ConnectionStatus::ConnectionLost,
            WifiStaState::Disconnected if self.ssid_missing => ConnectionStatus::SsidUnavailable,
            WifiStaState::Disconnected => ConnectionStatus::NotConnected,
            WifiStaState::Started if self.connect_failed => ConnectionStatus::ConnectFailed,
            WifiStaState::Started if self.scan_done => ConnectionStatus::ScanCompleted,
            WifiStaState::Started => ConnectionStatus::Idle,
            WifiStaState::Stopped => ConnectionStatus::NotConnected,
            _ => ConnectionStatus::Unknown,
        };
        if status == ConnectionStatus::Connected {
            self.was_connected = true;
        }
        status
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        self.stack.config_v4().map(|config| config.address.address())
    }

    async fn scan(&mut self, networks: &mut NetworkList) -> Result<(), LinkError> {
        if !self.is_started() {
            self.start(ClientConfig::default()).await?;
        }
        let found = self
            .controller
            .scan_with_config_async(ScanConfig::default())
            .await
            .map_err(|e| {
                warn!("wifi: scan failed: {:?}", e);
                LinkError::Scan
            })?;

        networks.clear();
        for ap in &found {
            let mut name = NetworkName::new();
            if name.push_str(ap.ssid.as_str()).is_err() {
                continue;
            }
            if networks.push(name).is_err() {
                break;
            }
        }
        if !self.ssid.is_empty() {
            self.ssid_missing = !found.iter().any(|ap| ap.ssid.as_str() == self.ssid.as_str());
        }
        self.scan_done = true;
        Ok(())
    }
}
