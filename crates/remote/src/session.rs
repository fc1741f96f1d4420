//! Session wiring
//!
//! A [`Session`] owns the state both threads share and starts them: the
//! decode thread (`vc8-decode`) reading the byte source, and the
//! [`DisplayLoop`] on the calling thread, which must be the thread that owns
//! the window.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use display::Renderer;
use phosphor::{BufferError, DecayStep, PhosphorBuffer};
use protocol::DisplayGeometry;
use tracing::info;

use crate::config::{ClientConfig, DEFAULT_TICK_INTERVAL};
use crate::decode::DecodeTask;
use crate::display_loop::DisplayLoop;
use crate::error::ClientError;
use crate::transport::{ByteSource, ControlSink};

/// Name of the decode thread.
pub const DECODE_THREAD: &str = "vc8-decode";

/// Cooperative stop flag.
#[derive(Debug, Default)]
pub struct Shutdown(AtomicBool);

impl Shutdown {
    /// Flag in the running state.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Ask both threads to stop. Idempotent.
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// `true` once [`request`](Self::request) has been called.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// State shared by the decode thread and the display loop.
#[derive(Debug)]
pub struct SharedState {
    buffer: PhosphorBuffer,
    shutdown: Shutdown,
    frames: AtomicU64,
}

impl SharedState {
    /// Dark `size × size` buffer, running, no frames.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError`] if `size` is not a power of two.
    pub fn new(size: u32, step: DecayStep) -> Result<Self, BufferError> {
        Ok(Self {
            buffer: PhosphorBuffer::new(size, step)?,
            shutdown: Shutdown::new(),
            frames: AtomicU64::new(0),
        })
    }

    /// The phosphor framebuffer.
    pub fn buffer(&self) -> &PhosphorBuffer {
        &self.buffer
    }

    /// The stop flag.
    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Count one decoded frame.
    pub fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Frames decoded so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

/// How a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user closed the display.
    Closed,
}

/// One connection's worth of display client.
#[derive(Debug)]
pub struct Session {
    state: Arc<SharedState>,
    geometry: DisplayGeometry,
    tick_interval: Duration,
    peer: String,
}

impl Session {
    /// Session for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Buffer`] if the framebuffer cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut session = Self::with_geometry(config.geometry, config.decay)?;
        session.tick_interval = config.tick_interval;
        session.peer = config.peer_label();
        Ok(session)
    }

    /// Session with default cadence and an unnamed peer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Buffer`] if the framebuffer cannot be created.
    pub fn with_geometry(geometry: DisplayGeometry, decay: DecayStep) -> Result<Self, ClientError> {
        Ok(Self {
            state: Arc::new(SharedState::new(geometry.size(), decay)?),
            geometry,
            tick_interval: DEFAULT_TICK_INTERVAL,
            peer: String::from("-"),
        })
    }

    /// Replace the display tick interval.
    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Replace the peer name shown in the status line.
    #[must_use]
    pub fn peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = peer.into();
        self
    }

    /// Handle on the shared state, for inspection.
    pub fn state(&self) -> Arc<SharedState> {
        Arc::clone(&self.state)
    }

    /// Run the session until the display closes or the stream fails.
    ///
    /// Spawns the decode thread on `source`, then runs the display loop on
    /// the calling thread with `renderer` and `sink`. Both threads have
    /// stopped when this returns.
    ///
    /// # Errors
    ///
    /// [`ClientError::Stream`] if the connection fails or closes,
    /// [`ClientError::Render`] if the display fails,
    /// [`ClientError::DecoderPanicked`] if the decode thread panics.
    pub fn run<R, S, K>(
        &self,
        renderer: &mut R,
        source: S,
        sink: K,
    ) -> Result<SessionEnd, ClientError>
    where
        R: Renderer + ?Sized,
        S: ByteSource + 'static,
        K: ControlSink,
    {
        let task = DecodeTask::new(source, self.geometry, Arc::clone(&self.state));
        let decoder = thread::Builder::new()
            .name(DECODE_THREAD.to_owned())
            .spawn(move || task.run())
            .map_err(ClientError::Spawn)?;

        info!(
            peer = %self.peer,
            size = self.geometry.size(),
            tick_ms = self.tick_interval.as_millis(),
            "session started"
        );

        DisplayLoop::new(renderer, sink, Arc::clone(&self.state), decoder)
            .tick_interval(self.tick_interval)
            .peer(self.peer.clone())
            .run()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_is_sticky() {
        let s = Shutdown::new();
        assert!(!s.is_requested());
        s.request();
        s.request();
        assert!(s.is_requested());
    }

    #[test]
    fn shared_state_counts_frames() {
        let state = SharedState::new(8, DecayStep::default()).unwrap();
        assert_eq!(state.frames(), 0);
        state.record_frame();
        state.record_frame();
        assert_eq!(state.frames(), 2);
        assert_eq!(state.buffer().size(), 8);
    }

    #[test]
    fn session_buffer_follows_geometry() {
        let geometry = DisplayGeometry::new(protocol::Magnification::X2);
        let session = Session::with_geometry(geometry, DecayStep::default()).unwrap();
        assert_eq!(session.state().buffer().size(), 1024);
    }
}
