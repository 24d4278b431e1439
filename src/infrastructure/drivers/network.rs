use core::str::FromStr;

use embassy_net::{DhcpConfig, IpAddress, Runner, Stack, StackResources, dns::DnsQueryType};
use esp_hal::peripherals::WIFI;
use esp_radio::wifi::{Config as WifiConfig, WifiController, WifiDevice};
use heapless::String;
use log::warn;

use netspeed_core::SessionError;

use super::random::get_seed;
use crate::config;
use crate::mk_static;

/// Sockets alive at once: DHCP, DNS and one session
const MAX_CONNECTIONS: usize = 4;

/// Bring up the radio and the DHCP-configured network stack
///
/// The returned runner must be spawned before any traffic flows.
pub fn init_network_stack(
    wifi_device: WIFI<'static>,
) -> (
    Stack<'static>,
    Runner<'static, WifiDevice<'static>>,
    WifiController<'static>,
) {
    let esp_radio_ctrl = &*mk_static!(esp_radio::Controller<'static>, esp_radio::init().unwrap());
    let wifi_config = WifiConfig::default();
    let (controller, interfaces) =
        esp_radio::wifi::new(esp_radio_ctrl, wifi_device, wifi_config).unwrap();
    let mut dhcp_config = DhcpConfig::default();
    let hostname = String::from_str(config::HOSTNAME).expect("Invalid hostname");
    dhcp_config.hostname = Some(hostname);

    let net_config = embassy_net::Config::dhcpv4(dhcp_config);

    let network_resources = mk_static!(
        StackResources<MAX_CONNECTIONS>,
        StackResources::<MAX_CONNECTIONS>::new()
    );
    let (stack, runner) =
        embassy_net::new(interfaces.sta, net_config, network_resources, get_seed());

    (stack, runner, controller)
}

/// Resolves a hostname to an IP address
pub(crate) async fn resolve_host(stack: Stack<'_>, host: &str) -> Result<IpAddress, SessionError> {
    if let Ok(ip) = host.parse::<embassy_net::Ipv4Address>() {
        return Ok(IpAddress::Ipv4(ip));
    }

    let addresses = stack
        .dns_query(host, DnsQueryType::A)
        .await
        .map_err(|e| {
            warn!("dns: lookup of {} failed: {:?}", host, e);
            SessionError::Dns
        })?;

    addresses.first().copied().ok_or(SessionError::Dns)
}
