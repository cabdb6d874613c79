use super::types::{IpConfig, ModemError, ScanTable, SpawnError};

/// Station-side view of the wifi driver. `await` points on this trait are
/// the only suspension points in the supervisor's control flow; every
/// method call is synchronous from the calling task's point of view.
pub trait WifiModem {
    /// Whether the station is currently associated with an access point.
    fn is_joined(&self) -> bool;

    /// Whether the station holds an IP configuration.
    fn has_ip_address(&self) -> bool;

    /// Scans for visible access points into `table`. The table is cleared
    /// by the caller before the call; the driver pushes up to
    /// [`ScanTable::capacity`] entries.
    async fn scan_access_points(&mut self, table: &mut ScanTable) -> Result<(), ModemError>;

    /// Associates and authenticates with `ssid`, returning the IP
    /// configuration snapshot once the link is up.
    async fn join_network(&mut self, ssid: &str, passphrase: &str)
        -> Result<IpConfig, ModemError>;

    /// Current IP configuration, if any.
    fn ip_config(&self) -> Option<IpConfig>;
}

/// Delay strategy between connection cycles. Injected so the retry loop is
/// deterministic under test; real embeddings sleep for the configured poll
/// interval.
pub trait RetryPacer {
    async fn pause(&mut self);
}

/// Non-blocking request to start the dependent network-client worker.
/// Implementations must reject (not queue) a second live worker.
pub trait WorkerSpawner {
    fn spawn_network_client(&mut self) -> Result<(), SpawnError>;
}
