//! Configuration options for the PC/SC transport

use std::time::Duration;

use pcsc::{Protocols, ShareMode};

/// Configuration options for [`crate::PcscTransport`]
#[derive(Debug, Clone)]
pub struct PcscConfig {
    /// Reader to connect to; `None` scans for the first reader with a card
    pub reader: Option<String>,

    /// Application identifier selected after opening the channel
    pub aid: Vec<u8>,

    /// Sharing mode for card connections
    pub share_mode: ShareMode,

    /// Preferred protocols for card communication
    pub protocols: Protocols,

    /// Maximum number of connection attempts before giving up
    pub max_connect_attempts: u32,

    /// Delay between connection attempts
    pub poll_interval: Duration,
}

impl Default for PcscConfig {
    fn default() -> Self {
        Self {
            reader: None,
            aid: Vec::new(),
            share_mode: ShareMode::Shared,
            protocols: Protocols::ANY,
            max_connect_attempts: 50,
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl PcscConfig {
    /// Create a new default configuration for the given application identifier
    pub fn with_aid(aid: impl Into<Vec<u8>>) -> Self {
        Self {
            aid: aid.into(),
            ..Self::default()
        }
    }

    /// Connect to a specific reader by name
    pub fn with_reader(mut self, reader: impl Into<String>) -> Self {
        self.reader = Some(reader.into());
        self
    }

    /// Set the sharing mode
    pub const fn with_share_mode(mut self, mode: ShareMode) -> Self {
        self.share_mode = mode;
        self
    }

    /// Set the connection retry policy
    pub const fn with_retry_policy(mut self, max_attempts: u32, poll_interval: Duration) -> Self {
        self.max_connect_attempts = max_attempts;
        self.poll_interval = poll_interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = PcscConfig::with_aid([0x35, 0x01, 0x02, 0x03, 0x04, 0x07])
            .with_reader("ACS ACR122U")
            .with_retry_policy(3, Duration::from_millis(50));

        assert_eq!(config.aid, vec![0x35, 0x01, 0x02, 0x03, 0x04, 0x07]);
        assert_eq!(config.reader.as_deref(), Some("ACS ACR122U"));
        assert_eq!(config.max_connect_attempts, 3);
        assert_eq!(config.poll_interval, Duration::from_millis(50));
    }
}
