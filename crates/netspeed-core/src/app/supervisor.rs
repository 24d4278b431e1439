use log::{error, info, warn};

use crate::app::poll::BoundedPoll;
use crate::config::{PollPolicy, WifiCredentials};
use crate::domain::ports::{Delay, NetworkList, WifiLink};

/// Keeps the station associated with the configured access point
pub struct ConnectionSupervisor<'a> {
    credentials: WifiCredentials<'a>,
    policy: PollPolicy,
}

impl<'a> ConnectionSupervisor<'a> {
    pub const fn new(credentials: WifiCredentials<'a>, policy: PollPolicy) -> Self {
        Self {
            credentials,
            policy,
        }
    }

    /// Re-associate from scratch and wait for the link
    ///
    /// Any existing association is dropped first, so calling this while
    /// connected always reconnects. Returns `true` as soon as the link
    /// reports connected.
    pub async fn ensure_connected<L: WifiLink, D: Delay>(&self, link: &mut L, delay: &D) -> bool {
        link.disconnect().await;

        info!("wifi: connecting to {}", self.credentials.ssid);
        if let Err(e) = link.begin(&self.credentials).await {
            error!("wifi: {}", e);
            return false;
        }

        let mut poll = BoundedPoll::new(self.policy);
        loop {
            let status = link.status();
            if status.is_connected() {
                match link.local_address() {
                    Some(address) => info!("wifi: {}, IP address: {}", status, address),
                    None => info!("wifi: {}", status),
                }
                return true;
            }
            if status.is_error() {
                warn!("wifi: {}", status);
            } else {
                info!("wifi: {}", status);
            }
            if !poll.wait(delay).await {
                break;
            }
        }

        error!("wifi: unable to connect after {} trials", poll.trials());
        false
    }

    /// Log the networks in range, returns how many were found
    pub async fn scan_networks<L: WifiLink>(&self, link: &mut L) -> usize {
        info!("wifi: scanning");
        let mut networks = NetworkList::new();
        if let Err(e) = link.scan(&mut networks).await {
            error!("wifi: {}", e);
            return 0;
        }
        if networks.is_empty() {
            warn!("wifi: no networks found");
            return 0;
        }
        info!("wifi: {} networks found", networks.len());
        for (i, ssid) in networks.iter().enumerate() {
            info!("  {}: {}", i + 1, ssid);
        }
        networks.len()
    }
}
