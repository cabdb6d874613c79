use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_net::{tcp::TcpSocket, IpListenEndpoint, Runner, Stack, StackResources};
use embassy_time::{Duration, Timer};
use embedded_io_async::Write as _;
use esp_hal::rng::Rng;
use esp_radio::wifi::{Config as WifiRuntimeConfig, WifiDevice};
use log::{error, info, warn};
use static_cell::StaticCell;

use crate::station::{
    EventDispatcher, ModemEvent, ResetLatch, RetryPacer, SpawnError, StationConfig, Supervisor,
    WifiModem, WorkerSpawner,
};

use super::modem::EspStationModem;

const LINK_STATUS_PORT: u16 = 8080;
const STATUS_RW_BUF: usize = 512;

// Radio buffer tuning; the station workload is scan and join, not bulk
// transfer, so the driver runs with small pools.
const WIFI_RX_QUEUE_SIZE: usize = 3;
const WIFI_TX_QUEUE_SIZE: usize = 2;
const WIFI_STATIC_RX_BUF_NUM: u8 = 4;
const WIFI_DYNAMIC_RX_BUF_NUM: u16 = 8;
const WIFI_DYNAMIC_TX_BUF_NUM: u16 = 8;

pub struct StationRuntime {
    pub modem: EspStationModem,
    pub net_runner: Runner<'static, WifiDevice<'static>>,
}

fn wifi_runtime_config() -> WifiRuntimeConfig {
    WifiRuntimeConfig::default()
        .with_rx_queue_size(WIFI_RX_QUEUE_SIZE)
        .with_tx_queue_size(WIFI_TX_QUEUE_SIZE)
        .with_static_rx_buf_num(WIFI_STATIC_RX_BUF_NUM)
        .with_dynamic_rx_buf_num(WIFI_DYNAMIC_RX_BUF_NUM)
        .with_dynamic_tx_buf_num(WIFI_DYNAMIC_TX_BUF_NUM)
        .with_ampdu_rx_enable(false)
        .with_ampdu_tx_enable(false)
}

/// Brings up the radio and the network stack. Call once, before the
/// executor starts.
pub fn setup(wifi: esp_hal::peripherals::WIFI<'static>) -> Result<StationRuntime, &'static str> {
    static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

    let radio_ctrl = esp_radio::init().map_err(|err| {
        error!("wavelink: esp_radio::init err={:?}", err);
        "wavelink: radio init failed"
    })?;
    let radio_ctrl = RADIO_CTRL.init(radio_ctrl);
    let (controller, ifaces) = esp_radio::wifi::new(radio_ctrl, wifi, wifi_runtime_config())
        .map_err(|err| {
            error!("wavelink: wifi init err={:?}", err);
            "wavelink: wifi init failed"
        })?;

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    let (stack, net_runner) = embassy_net::new(
        ifaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::<3>::new()),
        seed,
    );

    Ok(StationRuntime {
        modem: EspStationModem::new(controller, stack),
        net_runner,
    })
}

#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

struct IntervalPacer {
    interval_ms: u32,
}

impl RetryPacer for IntervalPacer {
    async fn pause(&mut self) {
        Timer::after(Duration::from_millis(self.interval_ms as u64)).await;
    }
}

/// Requests the link-status worker on the executor. The task pool holds a
/// single slot, so a second live worker is rejected rather than queued.
struct NetClientSpawner {
    spawner: Spawner,
    stack: Stack<'static>,
}

impl WorkerSpawner for NetClientSpawner {
    fn spawn_network_client(&mut self) -> Result<(), SpawnError> {
        self.spawner
            .spawn(link_status_task(self.stack))
            .map_err(|_| SpawnError)
    }
}

/// Owns the station lifecycle: supervision ticks interleaved with driver
/// event dispatch. The tick and the event wait share one poll interval.
#[embassy_executor::task]
pub async fn station_task(
    config: &'static StationConfig,
    mut modem: EspStationModem,
    spawner: Spawner,
) {
    static RESET_EVENTS: ResetLatch = ResetLatch::new();

    let mut dispatcher = EventDispatcher::new(
        NetClientSpawner {
            spawner,
            stack: modem.stack(),
        },
        &RESET_EVENTS,
    );
    let mut supervisor = Supervisor::new(config, &RESET_EVENTS);
    let mut pacer = IntervalPacer {
        interval_ms: config.poll_interval_ms,
    };
    let mut had_ip = modem.has_ip_address();

    info!("wavelink: station supervision started");
    loop {
        if let Err(err) = supervisor.tick(&mut modem, &mut pacer).await {
            error!("wavelink: station supervision stopped: {}", err);
            return;
        }

        let tick_gap = Timer::after(Duration::from_millis(config.poll_interval_ms as u64));
        match select(tick_gap, modem.next_event()).await {
            Either::First(()) => {}
            Either::Second(event) => {
                dispatcher.handle(&modem, &event);
            }
        }

        // The DHCP client has no driver event; detect the lease on the
        // none-to-some edge of the stack config.
        let has_ip = modem.has_ip_address();
        if has_ip && !had_ip {
            dispatcher.handle(&modem, &ModemEvent::IpAcquired);
        }
        had_ip = has_ip;
    }
}

/// Network client worker: answers TCP peers with a one-line link status.
/// Started by the dispatcher once the station holds an address.
#[embassy_executor::task]
pub async fn link_status_task(stack: Stack<'static>) {
    stack.wait_config_up().await;
    if let Some(cfg) = stack.config_v4() {
        info!(
            "wavelink: status listener on {}:{}",
            cfg.address.address(),
            LINK_STATUS_PORT
        );
    }

    let mut rx_buffer = [0u8; STATUS_RW_BUF];
    let mut tx_buffer = [0u8; STATUS_RW_BUF];
    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(10)));

    loop {
        let accepted = socket
            .accept(IpListenEndpoint {
                addr: None,
                port: LINK_STATUS_PORT,
            })
            .await;
        if let Err(err) = accepted {
            warn!("wavelink: status accept err={:?}", err);
            continue;
        }

        let mut line = heapless::String::<64>::new();
        match stack.config_v4() {
            Some(cfg) => {
                let _ = core::fmt::write(
                    &mut line,
                    format_args!("link up {} dhcp\r\n", cfg.address.address()),
                );
            }
            None => {
                warn!("wavelink: status request while link down");
                let _ = core::fmt::write(&mut line, format_args!("link down\r\n"));
            }
        }
        if let Err(err) = socket.write_all(line.as_bytes()).await {
            warn!("wavelink: status write err={:?}", err);
        }

        let _ = socket.flush().await;
        Timer::after(Duration::from_millis(20)).await;
        socket.close();
        Timer::after(Duration::from_millis(20)).await;
        socket.abort();
    }
}
