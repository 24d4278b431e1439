//! Connection supervisor against a scripted link.

mod common;

use common::{FakeClock, FakeLink, LinkCall};
use embassy_futures::block_on;
use embassy_time::Duration;
use netspeed_core::{ConnectionStatus, ConnectionSupervisor, LinkError, PollPolicy, WifiCredentials};

const CREDENTIALS: WifiCredentials<'static> = WifiCredentials::new("test-net", "secret");
const POLICY: PollPolicy = PollPolicy::new(20, Duration::from_millis(500));

fn supervisor() -> ConnectionSupervisor<'static> {
    ConnectionSupervisor::new(CREDENTIALS, POLICY)
}

// -----------------------------------------------------------------------------
// ensure_connected
// -----------------------------------------------------------------------------

#[test]
fn stops_polling_once_connected() {
    let clock = FakeClock::new();
    let mut link = FakeLink::new(&[
        ConnectionStatus::NotConnected,
        ConnectionStatus::Idle,
        ConnectionStatus::Idle,
        ConnectionStatus::ConnectFailed,
        ConnectionStatus::Connected,
        ConnectionStatus::ConnectionLost,
    ]);

    assert!(block_on(supervisor().ensure_connected(&mut link, &clock)));

    assert_eq!(link.status_polls(), 5);
    // Four sleeps between the five checks, none after success
    assert_eq!(clock.sleeps(), 4);
    assert_eq!(clock.uptime(), 2000);
}

#[test]
fn connected_on_first_poll_does_not_sleep() {
    let clock = FakeClock::new();
    let mut link = FakeLink::connected();

    assert!(block_on(supervisor().ensure_connected(&mut link, &clock)));

    assert_eq!(link.status_polls(), 1);
    assert_eq!(clock.sleeps(), 0);
}

#[test]
fn gives_up_after_exactly_twenty_polls() {
    let clock = FakeClock::new();
    let mut link = FakeLink::new(&[ConnectionStatus::Idle]);

    assert!(!block_on(supervisor().ensure_connected(&mut link, &clock)));

    assert_eq!(link.status_polls(), 20);
    assert_eq!(clock.sleeps(), 19);
    assert_eq!(clock.uptime(), 19 * 500);
}

#[test]
fn connecting_on_the_last_trial_still_succeeds() {
    let clock = FakeClock::new();
    let mut statuses = vec![ConnectionStatus::SsidUnavailable; 19];
    statuses.push(ConnectionStatus::Connected);
    let mut link = FakeLink::new(&statuses);

    assert!(block_on(supervisor().ensure_connected(&mut link, &clock)));
    assert_eq!(link.status_polls(), 20);
}

#[test]
fn always_disconnects_before_connecting() {
    let clock = FakeClock::new();
    let mut link = FakeLink::connected();
    let supervisor = supervisor();

    assert!(block_on(supervisor.ensure_connected(&mut link, &clock)));
    assert!(block_on(supervisor.ensure_connected(&mut link, &clock)));

    assert_eq!(
        link.calls,
        vec![
            LinkCall::Disconnect,
            LinkCall::Begin,
            LinkCall::Status,
            LinkCall::Disconnect,
            LinkCall::Begin,
            LinkCall::Status,
        ]
    );
}

#[test]
fn rejected_connect_request_fails_without_polling() {
    let clock = FakeClock::new();
    let mut link = FakeLink::connected();
    link.begin_error = Some(LinkError::Connect);

    assert!(!block_on(supervisor().ensure_connected(&mut link, &clock)));

    assert_eq!(link.calls, vec![LinkCall::Disconnect, LinkCall::Begin]);
    assert_eq!(clock.sleeps(), 0);
}

// -----------------------------------------------------------------------------
// scan_networks
// -----------------------------------------------------------------------------

#[test]
fn scan_counts_visible_networks() {
    let mut link = FakeLink::connected();
    link.scan_result = Ok(vec!["home", "office", "guest"]);

    assert_eq!(block_on(supervisor().scan_networks(&mut link)), 3);
    assert_eq!(link.calls, vec![LinkCall::Scan]);
}

#[test]
fn failed_or_empty_scan_reports_zero() {
    let mut link = FakeLink::connected();
    assert_eq!(block_on(supervisor().scan_networks(&mut link)), 0);

    link.scan_result = Err(LinkError::Scan);
    assert_eq!(block_on(supervisor().scan_networks(&mut link)), 0);
}

// -----------------------------------------------------------------------------
// ConnectionStatus
// -----------------------------------------------------------------------------

#[test]
fn status_descriptions_and_classification() {
    assert_eq!(ConnectionStatus::Connected.description(), "WiFi connected");
    assert_eq!(
        ConnectionStatus::SsidUnavailable.to_string(),
        "WiFi SSID not available"
    );
    assert!(!ConnectionStatus::Connected.is_error());
    assert!(!ConnectionStatus::ScanCompleted.is_error());
    assert!(ConnectionStatus::ConnectionLost.is_error());
    assert!(ConnectionStatus::Unknown.is_error());
    assert!(!ConnectionStatus::Idle.is_connected());
}
