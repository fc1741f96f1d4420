//! Command line

use std::time::Duration;

use clap::Parser;

use crate::config::{ClientConfig, DEFAULT_PORT, DEFAULT_READ_TIMEOUT_MS, DEFAULT_TICK_MS};
use crate::error::ConfigError;

/// Remote display for a PDP-8 VC8 point-plot display.
#[derive(Debug, Parser)]
#[command(name = "vc8-remote")]
#[command(about = "Persistent-phosphor display for a remote VC8", long_about = None)]
#[command(version)]
pub struct Args {
    /// Device host name or address
    pub host: String,

    /// Double the window size (1024×1024)
    #[arg(short = 'L', long)]
    pub large: bool,

    /// Device TCP port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Intensity lost per display tick (1-255)
    #[arg(long, default_value_t = phosphor::DEFAULT_DECAY_STEP)]
    pub decay: u8,

    /// Display tick interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Socket read timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_MS)]
    pub read_timeout_ms: u64,

    /// Run without a window (decode and decay only)
    #[arg(long)]
    pub headless: bool,
}

impl Args {
    /// Validate into a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for values the client cannot run with.
    pub fn into_config(self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::new(self.host)?
            .with_magnification(if self.large { 2 } else { 1 })?
            .with_decay(self.decay)?
            .with_read_timeout(Duration::from_millis(self.read_timeout_ms))?
            .with_tick_interval(Duration::from_millis(self.tick_ms))?;
        config.port = self.port;
        config.headless = self.headless || cfg!(feature = "headless");
        Ok(config)
    }
}
