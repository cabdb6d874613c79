use super::types::{CredentialsError, PreferredNetwork, PREFERRED_NETWORKS_MAX};

pub const POLL_INTERVAL_DEFAULT_MS: u32 = 1_000;
const POLL_INTERVAL_MIN_MS: u32 = 100;
const POLL_INTERVAL_MAX_MS: u32 = 60_000;

/// Operator-supplied station policy: the ordered preference list plus the
/// supervisor's poll interval. Built once at startup and injected; the
/// matching algorithm never mutates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationConfig {
    preferred: heapless::Vec<PreferredNetwork, PREFERRED_NETWORKS_MAX>,
    /// Supervisor tick interval; also the inter-cycle delay used by the
    /// connector's unlimited retry loop.
    pub poll_interval_ms: u32,
    /// When set, a modem reset observed by the event dispatcher forces the
    /// next supervisor tick to treat the link as unjoined instead of
    /// waiting for the driver's join flag to catch up.
    pub rejoin_on_reset: bool,
}

impl StationConfig {
    pub const fn new() -> Self {
        Self {
            preferred: heapless::Vec::new(),
            poll_interval_ms: POLL_INTERVAL_DEFAULT_MS,
            rejoin_on_reset: false,
        }
    }

    /// Appends a network at the lowest priority so far. Priority is the
    /// order of insertion.
    pub fn add_preferred(&mut self, ssid: &str, passphrase: &str) -> Result<(), CredentialsError> {
        let network = PreferredNetwork::new(ssid, passphrase)?;
        self.preferred
            .push(network)
            .map_err(|_| CredentialsError::TableFull)
    }

    pub fn preferred(&self) -> &[PreferredNetwork] {
        &self.preferred
    }

    pub const fn sanitized(mut self) -> Self {
        self.poll_interval_ms = clamp_u32(
            self.poll_interval_ms,
            POLL_INTERVAL_MIN_MS,
            POLL_INTERVAL_MAX_MS,
        );
        self
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self::new()
    }
}

const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_poll_interval() {
        let mut config = StationConfig::new();
        config.poll_interval_ms = 5;
        assert_eq!(config.sanitized().poll_interval_ms, 100);

        let mut config = StationConfig::new();
        config.poll_interval_ms = 600_000;
        assert_eq!(config.sanitized().poll_interval_ms, 60_000);

        let config = StationConfig::new();
        assert_eq!(config.sanitized().poll_interval_ms, POLL_INTERVAL_DEFAULT_MS);
    }

    #[test]
    fn preferred_list_keeps_insertion_order_and_bounds() {
        let mut config = StationConfig::new();
        for i in 0..PREFERRED_NETWORKS_MAX {
            let ssid = format!("net-{}", i);
            config.add_preferred(&ssid, "pass").unwrap();
        }
        assert_eq!(
            config.add_preferred("overflow", "pass"),
            Err(CredentialsError::TableFull)
        );
        assert_eq!(config.preferred()[0].ssid.as_str(), "net-0");
        assert_eq!(
            config.preferred()[PREFERRED_NETWORKS_MAX - 1].ssid.as_str(),
            format!("net-{}", PREFERRED_NETWORKS_MAX - 1)
        );
    }

    #[test]
    fn invalid_credentials_are_rejected() {
        let mut config = StationConfig::new();
        assert_eq!(
            config.add_preferred("", "pass"),
            Err(CredentialsError::EmptySsid)
        );
        assert!(config.preferred().is_empty());
    }
}
