pub mod config;
pub mod connector;
pub mod dispatcher;
pub mod modem;
pub mod supervisor;
pub mod types;

#[cfg(test)]
pub(crate) mod testkit;

pub use config::StationConfig;
pub use connector::Connector;
pub use dispatcher::{EventDispatcher, ResetLatch};
pub use modem::{RetryPacer, WifiModem, WorkerSpawner};
pub use supervisor::{LinkStateId, Supervisor};
pub use types::{
    ConnectError, CredentialsError, DiscoveredAp, EventStatus, FirmwareVersion, IpAddress,
    IpConfig, ModemError, ModemEvent, PreferredNetwork, ScanTable, SpawnError,
};
