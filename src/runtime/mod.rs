//! Hardware shell: the on-chip radio driver behind [`WifiModem`] plus the
//! embassy tasks that run the station.
//!
//! [`WifiModem`]: crate::station::WifiModem

mod modem;
mod tasks;

pub use modem::EspStationModem;
pub use tasks::{link_status_task, net_task, setup, station_task, StationRuntime};
