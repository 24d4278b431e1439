#![no_std]
#![no_main]

use embassy_executor::Spawner;

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};
use log::info;

use netspeed_core::Monitor;
use netspeed_monitor::config::{self, LED_ACTIVE_LOW};
use netspeed_monitor::infrastructure::drivers::{
    EmbassyClock, EspRng, EspWifiLink, SerialConsole, StatusLed, init_network_stack,
};
use netspeed_monitor::infrastructure::services::EspConnector;
use netspeed_monitor::infrastructure::tasks::network_runner_task;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Allocate heap memory (64 + 32 KB), the radio driver allocates from it
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );
    esp_alloc::heap_allocator!(size: 32 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Initialize network stack and spawn its runner
    let (stack, runner, controller) = init_network_stack(peripherals.WIFI);
    spawner.spawn(network_runner_task(runner)).ok();

    let led = StatusLed::new(netspeed_monitor::led_gpio!(peripherals), LED_ACTIVE_LOW);
    let link = EspWifiLink::new(controller, stack, config::WIFI_SSID);
    let net = EspConnector::new(stack, EspRng::new());

    info!("monitor: probing {} and reporting to {}", config::PROBE_HOST, config::TELEMETRY_HOST);
    let mut monitor = Monitor::new(config::MONITOR, link, net, led, EmbassyClock, SerialConsole);
    monitor.run().await
}
