//! Scripted fakes for exercising the connector, dispatcher, and supervisor
//! without a radio.

use super::modem::{RetryPacer, WifiModem, WorkerSpawner};
use super::types::{
    DiscoveredAp, IpAddress, IpConfig, ModemError, ScanTable, SpawnError, Ssid,
};

pub fn ap(ssid: &str, channel: u8, signal_strength: i8) -> DiscoveredAp {
    DiscoveredAp {
        ssid: Ssid::try_from(ssid).unwrap(),
        channel,
        signal_strength,
    }
}

/// Driver stand-in with a scripted scan sequence. Scans consume the script
/// in order; a successful join flips the modem to joined with an address.
pub struct FakeModem {
    pub joined: bool,
    pub has_ip: bool,
    pub ip: Option<IpConfig>,
    pub scan_calls: usize,
    pub join_attempts: Vec<(String, String)>,
    scan_script: Vec<Result<Vec<DiscoveredAp>, ModemError>>,
    fail_always: Vec<String>,
    fail_once: Vec<String>,
}

impl FakeModem {
    pub fn new() -> Self {
        Self {
            joined: false,
            has_ip: false,
            ip: None,
            scan_calls: 0,
            join_attempts: Vec::new(),
            scan_script: Vec::new(),
            fail_always: Vec::new(),
            fail_once: Vec::new(),
        }
    }

    pub fn joined_with_ip(octets: [u8; 4]) -> Self {
        let mut modem = Self::new();
        modem.joined = true;
        modem.has_ip = true;
        modem.ip = Some(IpConfig {
            address: IpAddress::V4(octets),
            dhcp_assigned: true,
        });
        modem
    }

    pub fn script_scan(&mut self, aps: Vec<DiscoveredAp>) {
        self.scan_script.push(Ok(aps));
    }

    pub fn script_scan_error(&mut self, err: ModemError) {
        self.scan_script.push(Err(err));
    }

    pub fn fail_joins_for(&mut self, ssid: &str) {
        self.fail_always.push(ssid.to_string());
    }

    pub fn fail_first_join_for(&mut self, ssid: &str) {
        self.fail_once.push(ssid.to_string());
    }

    /// Simulates a silent disconnect: the driver drops the association
    /// without delivering an event.
    pub fn drop_link(&mut self) {
        self.joined = false;
        self.has_ip = false;
        self.ip = None;
    }
}

impl WifiModem for FakeModem {
    fn is_joined(&self) -> bool {
        self.joined
    }

    fn has_ip_address(&self) -> bool {
        self.has_ip
    }

    async fn scan_access_points(&mut self, table: &mut ScanTable) -> Result<(), ModemError> {
        self.scan_calls += 1;
        if self.scan_script.is_empty() {
            return Ok(());
        }
        match self.scan_script.remove(0) {
            Ok(aps) => {
                for ap in aps {
                    table.push(ap);
                }
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn join_network(
        &mut self,
        ssid: &str,
        passphrase: &str,
    ) -> Result<IpConfig, ModemError> {
        self.join_attempts
            .push((ssid.to_string(), passphrase.to_string()));
        if let Some(pos) = self.fail_once.iter().position(|s| s == ssid) {
            self.fail_once.remove(pos);
            return Err(ModemError::Failed(1));
        }
        if self.fail_always.iter().any(|s| s == ssid) {
            return Err(ModemError::Failed(1));
        }
        let ip = IpConfig {
            address: IpAddress::V4([192, 168, 1, 100]),
            dhcp_assigned: true,
        };
        self.joined = true;
        self.has_ip = true;
        self.ip = Some(ip);
        Ok(ip)
    }

    fn ip_config(&self) -> Option<IpConfig> {
        self.ip
    }
}

#[derive(Default)]
pub struct CountingPacer {
    pub pauses: usize,
}

impl RetryPacer for CountingPacer {
    async fn pause(&mut self) {
        self.pauses += 1;
    }
}

#[derive(Default)]
pub struct RecordingSpawner {
    pub spawned: usize,
    pub reject: bool,
}

impl WorkerSpawner for RecordingSpawner {
    fn spawn_network_client(&mut self) -> Result<(), SpawnError> {
        if self.reject {
            return Err(SpawnError);
        }
        self.spawned += 1;
        Ok(())
    }
}
