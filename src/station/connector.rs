use log::{error, info, warn};

use super::{
    config::StationConfig,
    modem::{RetryPacer, WifiModem},
    types::{ConnectError, IpConfig, ModemError, ScanTable},
};

/// Scans for visible access points, cross-references them against the
/// configured preference list, and joins the first candidate that accepts.
/// Owns the discovery buffer; one instance per supervising task.
pub struct Connector<'a> {
    config: &'a StationConfig,
    table: ScanTable,
}

impl<'a> Connector<'a> {
    pub fn new(config: &'a StationConfig) -> Self {
        Self {
            config,
            table: ScanTable::new(),
        }
    }

    /// One blocking connection attempt, or an endless series of them when
    /// `unlimited` is set. Loops until joined; only
    /// [`ConnectError::DeviceAbsent`] breaks the unlimited loop.
    pub async fn connect<M: WifiModem, P: RetryPacer>(
        &mut self,
        modem: &mut M,
        pacer: &mut P,
        unlimited: bool,
    ) -> Result<IpConfig, ConnectError> {
        loop {
            if modem.is_joined() && modem.has_ip_address() {
                if let Some(ip) = modem.ip_config() {
                    return Ok(ip);
                }
            }

            info!("scanning for visible access points");
            self.table.clear();
            match modem.scan_access_points(&mut self.table).await {
                Ok(()) => match self.try_preferred(modem).await {
                    CycleOutcome::Joined(ip) => return Ok(ip),
                    CycleOutcome::AllJoinsFailed => {
                        if !unlimited {
                            return Err(ConnectError::JoinFailed);
                        }
                    }
                    CycleOutcome::NoCandidate => {
                        warn!(
                            "no preferred ssid among {} visible access points",
                            self.table.len()
                        );
                        if !unlimited {
                            return Err(ConnectError::NoMatchingNetwork);
                        }
                    }
                },
                Err(ModemError::DeviceAbsent) => {
                    error!("wifi device not present, giving up on connection attempts");
                    return Err(ConnectError::DeviceAbsent);
                }
                Err(err) => {
                    warn!("access point scan failed: {}", err);
                    if !unlimited {
                        return Err(ConnectError::ScanFailed);
                    }
                }
            }

            pacer.pause().await;
        }
    }

    /// Walks the preference list in priority order against the discovery
    /// buffer; first successful join wins.
    async fn try_preferred<M: WifiModem>(&mut self, modem: &mut M) -> CycleOutcome {
        for ap in self.table.iter() {
            info!(
                "ap found: {} ch={} rssi={}",
                ap.ssid, ap.channel, ap.signal_strength
            );
        }

        let mut candidate_seen = false;
        for network in self.config.preferred() {
            for ap in self.table.iter().filter(|ap| ap.ssid == network.ssid) {
                candidate_seen = true;
                info!(
                    "joining \"{}\" (ch={} rssi={})",
                    network.ssid, ap.channel, ap.signal_strength
                );
                match modem.join_network(&network.ssid, &network.passphrase).await {
                    Ok(ip) => {
                        info!("joined \"{}\"", network.ssid);
                        info!(
                            "station ip: {}, dhcp: {}",
                            ip.address,
                            if ip.dhcp_assigned { "yes" } else { "no" }
                        );
                        return CycleOutcome::Joined(ip);
                    }
                    Err(err) => {
                        warn!("join attempt on \"{}\" failed: {}", network.ssid, err);
                    }
                }
            }
        }

        if candidate_seen {
            CycleOutcome::AllJoinsFailed
        } else {
            CycleOutcome::NoCandidate
        }
    }
}

enum CycleOutcome {
    Joined(IpConfig),
    AllJoinsFailed,
    NoCandidate,
}
