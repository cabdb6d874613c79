#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use log::{error, warn};
use static_cell::StaticCell;
use wavelink::{runtime, StationConfig};

const WIFI_HEAP_BYTES: usize = 96 * 1024;

fn station_config() -> StationConfig {
    let mut config = StationConfig::new();
    let entries = [
        (
            option_env!("WAVELINK_WIFI_SSID"),
            option_env!("WAVELINK_WIFI_PASSWORD"),
        ),
        (
            option_env!("WAVELINK_WIFI_SSID_2"),
            option_env!("WAVELINK_WIFI_PASSWORD_2"),
        ),
    ];
    for (ssid, passphrase) in entries {
        let Some(ssid) = ssid else { continue };
        if let Err(err) = config.add_preferred(ssid, passphrase.unwrap_or("")) {
            warn!("wavelink: skipping preferred network: {}", err);
        }
    }
    config.sanitized()
}

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();

    let peripherals = esp_hal::init(esp_hal::Config::default());
    esp_alloc::heap_allocator!(size: WIFI_HEAP_BYTES);
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    static CONFIG: StaticCell<StationConfig> = StaticCell::new();
    let config = CONFIG.init(station_config());
    if config.preferred().is_empty() {
        warn!("wavelink: no preferred networks compiled in; the station will scan forever");
    }

    let station = match runtime::setup(peripherals.WIFI) {
        Ok(station) => station,
        Err(msg) => {
            error!("{}", msg);
            halt_forever();
        }
    };

    let mut executor = esp_rtos::embassy::Executor::new();
    let executor = unsafe { make_static(&mut executor) };
    executor.run(move |spawner| {
        spawner.must_spawn(runtime::net_task(station.net_runner));
        spawner.must_spawn(runtime::station_task(config, station.modem, spawner));
    });
}

unsafe fn make_static<T>(value: &mut T) -> &'static mut T {
    unsafe { core::mem::transmute(value) }
}

fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
