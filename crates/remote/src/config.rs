//! Client configuration
//!
//! [`ClientConfig`] is the validated form of the command line. Defaults are
//! the values the VC8 remote service expects.

use std::time::Duration;

use phosphor::DecayStep;
use protocol::{DisplayGeometry, Magnification};

use crate::error::ConfigError;

/// TCP port of the VC8 remote service.
pub const DEFAULT_PORT: u16 = 2222;

/// Display tick in milliseconds: one decay step and one present.
pub const DEFAULT_TICK_MS: u64 = 2;

/// [`DEFAULT_TICK_MS`] as a duration.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(DEFAULT_TICK_MS);

/// Socket read timeout in milliseconds; bounds how long shutdown waits for
/// the decode thread.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// [`DEFAULT_READ_TIMEOUT_MS`] as a duration.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(DEFAULT_READ_TIMEOUT_MS);

/// How often the status line is refreshed.
pub const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Validated client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Device host name or address.
    pub host: String,
    /// Device port.
    pub port: u16,
    /// Display grid.
    pub geometry: DisplayGeometry,
    /// Intensity lost per tick.
    pub decay: DecayStep,
    /// Time between display ticks.
    pub tick_interval: Duration,
    /// Read timeout on the device connection.
    pub read_timeout: Duration,
    /// Run without a window.
    pub headless: bool,
}

impl ClientConfig {
    /// Defaults for `host`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyHost`] if `host` is blank.
    pub fn new(host: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        Ok(Self {
            host,
            port: DEFAULT_PORT,
            geometry: DisplayGeometry::default(),
            decay: DecayStep::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            read_timeout: DEFAULT_READ_TIMEOUT,
            headless: false,
        })
    }

    /// Set the magnification (1 or 2).
    ///
    /// # Errors
    ///
    /// [`ConfigError::Geometry`] for any other factor.
    pub fn with_magnification(mut self, factor: u32) -> Result<Self, ConfigError> {
        self.geometry = DisplayGeometry::new(Magnification::new(factor)?);
        Ok(self)
    }

    /// Set the decay step.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Decay`] for zero.
    pub fn with_decay(mut self, step: u8) -> Result<Self, ConfigError> {
        self.decay = DecayStep::new(step)?;
        Ok(self)
    }

    /// Set the display tick interval.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroTickInterval`] for a zero duration.
    pub fn with_tick_interval(mut self, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        self.tick_interval = interval;
        Ok(self)
    }

    /// Set the read timeout.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroReadTimeout`] for a zero duration.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroReadTimeout);
        }
        self.read_timeout = timeout;
        Ok(self)
    }

    /// `host:port`, as shown in the status line.
    pub fn peer_label(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service() {
        let config = ClientConfig::new("pdp8").unwrap();
        assert_eq!(config.port, 2222);
        assert_eq!(config.geometry.size(), 512);
        assert_eq!(config.decay.get(), 8);
        assert_eq!(config.tick_interval, Duration::from_millis(2));
        assert_eq!(config.read_timeout, Duration::from_secs(1));
        assert_eq!(config.peer_label(), "pdp8:2222");
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(ClientConfig::new("  "), Err(ConfigError::EmptyHost));
        let config = ClientConfig::new("pdp8").unwrap();
        assert!(matches!(
            config.clone().with_magnification(3),
            Err(ConfigError::Geometry(_))
        ));
        assert!(matches!(config.clone().with_decay(0), Err(ConfigError::Decay(_))));
        assert_eq!(
            config.clone().with_read_timeout(Duration::ZERO),
            Err(ConfigError::ZeroReadTimeout)
        );
        assert_eq!(
            config.with_tick_interval(Duration::ZERO),
            Err(ConfigError::ZeroTickInterval)
        );
    }

    #[test]
    fn tick_interval_is_set() {
        let config = ClientConfig::new("pdp8")
            .unwrap()
            .with_tick_interval(Duration::from_millis(7))
            .unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(7));
    }

    #[test]
    fn large_display_doubles_size() {
        let config = ClientConfig::new("pdp8").unwrap().with_magnification(2).unwrap();
        assert_eq!(config.geometry.size(), 1024);
    }
}
