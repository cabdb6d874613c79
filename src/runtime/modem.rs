use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};
use esp_radio::wifi::{
    ClientConfig, ModeConfig, ScanConfig, WifiController, WifiError, WifiEvent,
};

use crate::station::{
    DiscoveredAp, IpAddress, IpConfig, ModemError, ModemEvent, ScanTable, WifiModem,
};
use crate::station::types::Ssid;

/// How long a join waits for DHCP before the attempt counts as failed.
const DHCP_TIMEOUT_SECS: u64 = 20;

/// Station driver backed by the on-chip radio and the embassy network
/// stack. Join state comes from the controller; address state from the
/// stack's DHCP client.
pub struct EspStationModem {
    controller: WifiController<'static>,
    stack: Stack<'static>,
}

impl EspStationModem {
    pub fn new(controller: WifiController<'static>, stack: Stack<'static>) -> Self {
        Self { controller, stack }
    }

    pub fn stack(&self) -> Stack<'static> {
        self.stack
    }

    /// Waits for the next driver lifecycle notification. Distinct pending
    /// events are collapsed to the most significant one.
    pub async fn next_event(&mut self) -> ModemEvent {
        loop {
            let fired = self
                .controller
                .wait_for_events(
                    WifiEvent::WifiReady
                        | WifiEvent::StaStart
                        | WifiEvent::StaStop
                        | WifiEvent::StaConnected
                        | WifiEvent::StaDisconnected,
                    false,
                )
                .await;

            if fired.contains(WifiEvent::StaDisconnected) {
                return ModemEvent::StationDisconnected;
            }
            if fired.contains(WifiEvent::StaConnected) {
                return ModemEvent::StationJoined;
            }
            if fired.contains(WifiEvent::StaStop) {
                return ModemEvent::ResetDetected;
            }
            if fired.contains(WifiEvent::WifiReady) || fired.contains(WifiEvent::StaStart) {
                return ModemEvent::InitFinished;
            }
        }
    }
}

impl WifiModem for EspStationModem {
    fn is_joined(&self) -> bool {
        self.controller.is_connected().unwrap_or(false)
    }

    fn has_ip_address(&self) -> bool {
        self.stack.config_v4().is_some()
    }

    async fn scan_access_points(&mut self, table: &mut ScanTable) -> Result<(), ModemError> {
        let config = ScanConfig::default()
            .with_show_hidden(true)
            .with_max(table.capacity());
        let found = self
            .controller
            .scan_with_config_async(config)
            .await
            .map_err(driver_error)?;

        for ap in found {
            let Ok(ssid) = Ssid::try_from(ap.ssid.as_str()) else {
                continue;
            };
            table.push(DiscoveredAp {
                ssid,
                channel: ap.channel,
                signal_strength: ap.signal_strength,
            });
        }
        Ok(())
    }

    async fn join_network(
        &mut self,
        ssid: &str,
        passphrase: &str,
    ) -> Result<IpConfig, ModemError> {
        let client = ClientConfig::default()
            .with_ssid(ssid.into())
            .with_password(passphrase.into());
        self.controller
            .set_config(&ModeConfig::Client(client))
            .map_err(driver_error)?;

        match self.controller.is_started() {
            Ok(true) => {}
            Ok(false) => self.controller.start_async().await.map_err(driver_error)?,
            Err(err) => return Err(driver_error(err)),
        }

        self.controller.connect_async().await.map_err(driver_error)?;

        if with_timeout(
            Duration::from_secs(DHCP_TIMEOUT_SECS),
            self.stack.wait_config_up(),
        )
        .await
        .is_err()
        {
            // Associated but no lease; tear down so the next candidate
            // starts from a clean slate.
            let _ = self.controller.disconnect_async().await;
            return Err(ModemError::Timeout);
        }

        self.ip_config().ok_or(ModemError::Timeout)
    }

    fn ip_config(&self) -> Option<IpConfig> {
        let config = self.stack.config_v4()?;
        Some(IpConfig {
            address: IpAddress::V4(config.address.address().octets()),
            dhcp_assigned: true,
        })
    }
}

fn driver_error(err: WifiError) -> ModemError {
    match err {
        WifiError::NotInitialized => ModemError::DeviceAbsent,
        WifiError::Disconnected => ModemError::Failed(1),
        WifiError::UnknownWifiMode => ModemError::Failed(2),
        WifiError::Unsupported => ModemError::Failed(3),
        WifiError::InvalidArguments => ModemError::Failed(4),
        WifiError::InternalError(_) => ModemError::Failed(5),
    }
}
