//! Client error types

use display::RenderError;
use phosphor::{BufferError, ZeroDecayStep};
use thiserror::Error;

use crate::transport::{ConnectError, TransportError};

/// Invalid client settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Unsupported magnification.
    #[error(transparent)]
    Geometry(#[from] protocol::ConfigError),

    /// Decay step of zero.
    #[error(transparent)]
    Decay(#[from] ZeroDecayStep),

    /// Host is empty.
    #[error("host must not be empty")]
    EmptyHost,

    /// A zero read timeout would make every read fail immediately.
    #[error("read timeout must be at least 1 ms")]
    ZeroReadTimeout,

    /// A zero tick would spin the display loop without sleeping.
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,
}

/// Everything that can end a client run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Settings were rejected before connecting.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The device could not be reached.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// The connection failed or closed mid-session.
    #[error("stream error: {0}")]
    Stream(#[from] TransportError),

    /// The display could not present or was lost.
    #[error("display error: {0}")]
    Render(#[from] RenderError),

    /// The framebuffer could not be created.
    #[error("framebuffer error: {0}")]
    Buffer(#[from] BufferError),

    /// The OS refused to start the decode thread.
    #[error("failed to spawn decode thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The decode thread panicked.
    #[error("decode thread panicked")]
    DecoderPanicked,
}

// `main` wraps this in `anyhow::Error`, which needs both bounds.
const _: () = {
    const fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<ClientError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failure_converts_into_anyhow() {
        let err = ClientError::from(RenderError::Surface("lost".into()));
        let wrapped = anyhow::Error::new(err).context("display");
        assert_eq!(format!("{wrapped:#}"), "display: display error: surface error: lost");
    }

    #[test]
    fn zero_tick_interval_message() {
        assert_eq!(
            ConfigError::ZeroTickInterval.to_string(),
            "tick interval must be at least 1 ms"
        );
    }
}
