use core::fmt;

/// IEEE 802.11 SSID length limit.
pub const SSID_MAX: usize = 32;
/// WPA2 passphrase length limit.
pub const PASSPHRASE_MAX: usize = 64;
/// Capacity of the discovery buffer filled by one scan.
pub const SCAN_TABLE_CAPACITY: usize = 100;
/// Maximum number of operator-supplied preferred networks.
pub const PREFERRED_NETWORKS_MAX: usize = 8;

pub type Ssid = heapless::String<SSID_MAX>;
pub type Passphrase = heapless::String<PASSPHRASE_MAX>;

/// One entry of the operator-supplied preference list. Order in the list
/// defines connection priority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreferredNetwork {
    pub ssid: Ssid,
    pub passphrase: Passphrase,
}

impl PreferredNetwork {
    pub fn new(ssid: &str, passphrase: &str) -> Result<Self, CredentialsError> {
        if ssid.is_empty() {
            return Err(CredentialsError::EmptySsid);
        }
        let ssid = Ssid::try_from(ssid).map_err(|_| CredentialsError::SsidTooLong)?;
        let passphrase =
            Passphrase::try_from(passphrase).map_err(|_| CredentialsError::PassphraseTooLong)?;
        Ok(Self { ssid, passphrase })
    }
}

/// Access point visible in the most recent scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscoveredAp {
    pub ssid: Ssid,
    pub channel: u8,
    pub signal_strength: i8,
}

/// Bounded discovery buffer. Cleared before every scan; entries pushed past
/// capacity are dropped, so `len() <= SCAN_TABLE_CAPACITY` and only entries
/// from the most recent scan are ever visible.
#[derive(Debug, Default)]
pub struct ScanTable {
    entries: heapless::Vec<DiscoveredAp, SCAN_TABLE_CAPACITY>,
}

impl ScanTable {
    pub const fn new() -> Self {
        Self {
            entries: heapless::Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, ap: DiscoveredAp) {
        let _ = self.entries.push(ap);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        SCAN_TABLE_CAPACITY
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveredAp> {
        self.entries.iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IpAddress {
    V4([u8; 4]),
    V6([u16; 8]),
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddress::V4(octets) => write!(
                f,
                "{}.{}.{}.{}",
                octets[0], octets[1], octets[2], octets[3]
            ),
            IpAddress::V6(groups) => write!(
                f,
                "{:04x}:{:04x}:{:04x}:{:04x}:{:04x}:{:04x}:{:04x}:{:04x}",
                groups[0],
                groups[1],
                groups[2],
                groups[3],
                groups[4],
                groups[5],
                groups[6],
                groups[7]
            ),
        }
    }
}

/// Snapshot of the station's IP configuration, taken at join time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IpConfig {
    pub address: IpAddress,
    pub dhcp_assigned: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Driver-level failure reported by a [`WifiModem`](super::WifiModem) call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModemError {
    /// The modem hardware did not respond at all. Fatal, never retried.
    DeviceAbsent,
    Timeout,
    Failed(u8),
}

impl fmt::Display for ModemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModemError::DeviceAbsent => write!(f, "wifi device not present"),
            ModemError::Timeout => write!(f, "operation timed out"),
            ModemError::Failed(code) => write!(f, "driver error code {}", code),
        }
    }
}

/// Terminal outcome of one connection cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectError {
    /// The modem hardware is absent; propagated even under unlimited retry.
    DeviceAbsent,
    /// The scan failed for a transient reason and retry was not requested.
    ScanFailed,
    /// Preferred networks were visible but every join attempt was rejected.
    JoinFailed,
    /// No preferred SSID was present among the discovered access points.
    NoMatchingNetwork,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::DeviceAbsent => write!(f, "wifi device not present"),
            ConnectError::ScanFailed => write!(f, "access point scan failed"),
            ConnectError::JoinFailed => write!(f, "all candidate join attempts failed"),
            ConnectError::NoMatchingNetwork => write!(f, "no preferred network visible"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialsError {
    EmptySsid,
    SsidTooLong,
    PassphraseTooLong,
    TableFull,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsError::EmptySsid => write!(f, "ssid is empty"),
            CredentialsError::SsidTooLong => write!(f, "ssid longer than {} bytes", SSID_MAX),
            CredentialsError::PassphraseTooLong => {
                write!(f, "passphrase longer than {} bytes", PASSPHRASE_MAX)
            }
            CredentialsError::TableFull => {
                write!(f, "preferred network table full ({})", PREFERRED_NETWORKS_MAX)
            }
        }
    }
}

/// A worker spawn request was rejected (already running or pool exhausted).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnError;

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network client task spawn rejected")
    }
}

/// Lifecycle notification delivered by the wifi driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModemEvent {
    FirmwareUnsupported {
        minimum: FirmwareVersion,
        current: FirmwareVersion,
    },
    InitFinished,
    ResetDetected,
    IpAcquired,
    StationJoined,
    StationDisconnected,
}

/// Status returned to the driver after event delivery. The dispatcher never
/// asks the driver to alter its behavior, so there is only one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventStatus {
    Accepted,
}
