#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

pub mod station;

#[cfg(feature = "esp-runtime")]
pub mod runtime;

pub use station::{
    ConnectError, Connector, CredentialsError, DiscoveredAp, EventDispatcher, EventStatus,
    FirmwareVersion, IpAddress, IpConfig, LinkStateId, ModemError, ModemEvent, PreferredNetwork,
    ResetLatch, RetryPacer, ScanTable, SpawnError, StationConfig, Supervisor, WifiModem,
    WorkerSpawner,
};
