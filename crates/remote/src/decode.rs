//! Decode thread
//!
//! [`StreamDecoder`] turns a [`ByteSource`] into coordinate frames, polling
//! the shutdown flag whenever a read times out. [`DecodeTask`] is the body of
//! the `vc8-decode` thread: every frame lights its 2×2 footprint at full
//! intensity in the shared buffer.

use std::sync::Arc;

use phosphor::MAX_INTENSITY;
use protocol::{CoordinateFrame, DisplayGeometry, SyncDecoder};
use tracing::{debug, info, trace, warn};

use crate::session::{SharedState, Shutdown};
use crate::transport::{ByteSource, Received, TransportError};

/// Bytes requested per read.
pub const READ_CHUNK: usize = 4096;

/// Frame reader over a byte source.
#[derive(Debug)]
pub struct StreamDecoder<S> {
    source: S,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
    sync: SyncDecoder,
}

impl<S: ByteSource> StreamDecoder<S> {
    /// Decoder hunting for sync on a fresh connection.
    pub fn new(source: S) -> Self {
        Self {
            source,
            buf: vec![0; READ_CHUNK].into_boxed_slice(),
            pos: 0,
            filled: 0,
            sync: SyncDecoder::new(),
        }
    }

    /// Next complete frame.
    ///
    /// Returns `Ok(None)` once `shutdown` is requested. Bytes already read are
    /// decoded before the flag is checked; a read error raised after shutdown
    /// was requested is not reported.
    ///
    /// # Errors
    ///
    /// Returns the [`TransportError`] that ended the stream.
    // SAFETY: `i < pending.len()` and `pos + pending.len() == filled <= buf.len()`.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn next_frame(
        &mut self,
        shutdown: &Shutdown,
    ) -> Result<Option<CoordinateFrame>, TransportError> {
        loop {
            let pending = self.buf.get(self.pos..self.filled).unwrap_or_default();
            for (i, &byte) in pending.iter().enumerate() {
                if let Some(frame) = self.sync.push(byte) {
                    self.pos += i + 1;
                    return Ok(Some(frame));
                }
            }
            self.pos = self.filled;

            if shutdown.is_requested() {
                return Ok(None);
            }

            match self.source.receive(&mut self.buf) {
                Ok(Received::Bytes(n)) => {
                    trace!(bytes = n, "read");
                    self.pos = 0;
                    self.filled = n.min(self.buf.len());
                }
                Ok(Received::WouldBlock) => {}
                Err(_) if shutdown.is_requested() => return Ok(None),
                Err(e) => return Err(e),
            }
        }
    }
}

/// Decode thread body: frames in, plotted footprints out.
#[derive(Debug)]
pub struct DecodeTask<S> {
    decoder: StreamDecoder<S>,
    geometry: DisplayGeometry,
    state: Arc<SharedState>,
}

impl<S: ByteSource> DecodeTask<S> {
    /// Task plotting into `state.buffer()` with `geometry`.
    pub fn new(source: S, geometry: DisplayGeometry, state: Arc<SharedState>) -> Self {
        Self {
            decoder: StreamDecoder::new(source),
            geometry,
            state,
        }
    }

    /// Decode until shutdown or a stream error. Returns the frame count.
    ///
    /// # Errors
    ///
    /// Returns the [`TransportError`] that ended the stream; closure by the
    /// peer is [`TransportError::Closed`].
    pub fn run(mut self) -> Result<u64, TransportError> {
        info!(size = self.geometry.size(), "decode task started");
        let mut frames: u64 = 0;
        loop {
            let frame = match self.decoder.next_frame(self.state.shutdown()) {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(error) => {
                    warn!(%error, frames, "stream ended");
                    return Err(error);
                }
            };
            for point in self.geometry.footprint(frame, MAX_INTENSITY) {
                self.state.buffer().plot(point.x, point.y, point.intensity);
            }
            self.state.record_frame();
            frames = frames.saturating_add(1);
            if frames.is_power_of_two() {
                debug!(frames, raw_x = frame.raw_x(), raw_y = frame.raw_y(), "decoded");
            }
        }
        info!(frames, "decode task stopped");
        Ok(frames)
    }
}
