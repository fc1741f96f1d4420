//! Fixed-cadence display loop
//!
//! Each tick, in order:
//!
//! 1. fade every lit cell by one decay step
//! 2. present the buffer
//! 3. drain pending input; a key transition updates the switch register and
//!    sends it (key-down auto-repeats are ignored)
//! 4. check whether the decode thread has ended
//! 5. publish the status line if a second has passed
//!
//! then sleep for the tick interval. The fade rate therefore depends only on
//! the tick interval, never on how fast samples arrive.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use display::{DisplayEvent, Renderer};
use protocol::{SwitchKey, SwitchRegister};
use tracing::{debug, error, info, warn};

use crate::config::{DEFAULT_TICK_INTERVAL, STATUS_INTERVAL};
use crate::error::ClientError;
use crate::session::{SessionEnd, SharedState};
use crate::transport::{ControlSink, TransportError};

type DecoderHandle = JoinHandle<Result<u64, TransportError>>;

/// Display side of a session.
pub struct DisplayLoop<'r, R: ?Sized, K> {
    renderer: &'r mut R,
    sink: K,
    state: Arc<SharedState>,
    decoder: Option<DecoderHandle>,
    register: SwitchRegister,
    tick_interval: Duration,
    peer: String,
    status_at: Instant,
    status_frames: u64,
    ticks: u64,
}

impl<'r, R, K> DisplayLoop<'r, R, K>
where
    R: Renderer + ?Sized,
    K: ControlSink,
{
    /// Loop over `renderer`, sending switches to `sink`, watching `decoder`.
    pub fn new(renderer: &'r mut R, sink: K, state: Arc<SharedState>, decoder: DecoderHandle) -> Self {
        Self {
            renderer,
            sink,
            status_frames: state.frames(),
            state,
            decoder: Some(decoder),
            register: SwitchRegister::new(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            peer: String::from("-"),
            status_at: Instant::now(),
            ticks: 0,
        }
    }

    /// Replace the tick interval.
    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Replace the peer name shown in the status line.
    #[must_use]
    pub fn peer(mut self, peer: String) -> Self {
        self.peer = peer;
        self
    }

    /// Run ticks until the display closes or something fails.
    ///
    /// The decode thread has been joined when this returns.
    ///
    /// # Errors
    ///
    /// See [`Session::run`](crate::Session::run).
    pub fn run(mut self) -> Result<SessionEnd, ClientError> {
        let result = loop {
            match self.tick() {
                Ok(Some(end)) => break Ok(end),
                Ok(None) => thread::sleep(self.tick_interval),
                Err(e) => break Err(e),
            }
        };
        if let Err(ref e) = result {
            error!(error = %e, ticks = self.ticks, "session failed");
            // Already failing; the decoder's own outcome adds nothing.
            let _ = self.stop();
        }
        result
    }

    /// One decay/present/input/health pass.
    ///
    /// Returns `Ok(Some(_))` when the session is over.
    ///
    /// # Errors
    ///
    /// See [`Session::run`](crate::Session::run).
    pub fn tick(&mut self) -> Result<Option<SessionEnd>, ClientError> {
        self.ticks = self.ticks.saturating_add(1);
        self.state.buffer().decay_tick();
        self.renderer.present(self.state.buffer())?;

        while let Some(event) = self.renderer.poll_event() {
            match event {
                DisplayEvent::CloseRequested => {
                    info!(ticks = self.ticks, frames = self.state.frames(), "display closed");
                    self.stop()?;
                    return Ok(Some(SessionEnd::Closed));
                }
                DisplayEvent::Switch {
                    key,
                    pressed,
                    repeat,
                } => self.switch(key, pressed, repeat)?,
            }
        }

        if self.decoder.as_ref().is_some_and(JoinHandle::is_finished) {
            return match self.join_decoder() {
                // The decoder only returns Ok after shutdown, which this loop
                // has not requested; treat it as the stream ending.
                Ok(_) => Err(ClientError::Stream(TransportError::Closed)),
                Err(e) => Err(e),
            };
        }

        self.publish_status();
        Ok(None)
    }

    fn switch(&mut self, key: SwitchKey, pressed: bool, repeat: bool) -> Result<(), ClientError> {
        if pressed && repeat {
            return Ok(());
        }
        if pressed {
            self.register.press(key);
        } else {
            self.register.release(key);
        }
        debug!(?key, pressed, register = format_args!("{:#05x}", self.register.bits()), "switch register");
        self.sink.send(&self.register.encode())?;
        Ok(())
    }

    // SAFETY: frame counts are monotonic, so `now >= status_frames`; the
    // product overflows only after ~1.8e16 frames.
    #[allow(clippy::arithmetic_side_effects)]
    fn publish_status(&mut self) {
        let elapsed = self.status_at.elapsed();
        if elapsed < STATUS_INTERVAL {
            return;
        }
        let now = self.state.frames();
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX).max(1);
        let rate = (now - self.status_frames).saturating_mul(1000) / millis;
        self.renderer.set_status(&status_line(&self.peer, rate));
        self.status_at = Instant::now();
        self.status_frames = now;
    }

    /// Request shutdown, close the sink and join the decoder.
    fn stop(&mut self) -> Result<u64, ClientError> {
        self.state.shutdown().request();
        self.sink.close();
        self.join_decoder()
    }

    fn join_decoder(&mut self) -> Result<u64, ClientError> {
        let Some(handle) = self.decoder.take() else {
            return Ok(self.state.frames());
        };
        match handle.join() {
            Ok(Ok(frames)) => Ok(frames),
            Ok(Err(e)) if self.state.shutdown().is_requested() => {
                warn!(error = %e, "decoder ended after shutdown");
                Ok(self.state.frames())
            }
            Ok(Err(e)) => Err(ClientError::Stream(e)),
            Err(_) => Err(ClientError::DecoderPanicked),
        }
    }
}

/// Window title text for a peer and frame rate.
pub fn status_line(peer: &str, frames_per_second: u64) -> String {
    format!("VC8 Display — {peer} — {frames_per_second} frames/s")
}
