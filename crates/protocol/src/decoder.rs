//! Sync marker detection and frame extraction.
//!
//! [`SyncDecoder`] is a byte-at-a-time state machine with no I/O of its own.
//! The transport layer feeds it whatever chunk sizes the socket returns;
//! partial frames carry over between chunks.
//!
//! # States
//!
//! ```text
//!            0x00            0x00
//! Hunting{0} ----> Hunting{1} ----> Collecting{0}
//!     ^   non-zero    |                  |  any byte x4
//!     +---------------+                  |
//!     +----------------------------------+  (frame emitted)
//! ```
//!
//! While collecting, payload bytes are taken verbatim. A zero inside a payload
//! is data, not half of a sync marker, so the decoder never re-scans those
//! four bytes.

use crate::frame::{CoordinateFrame, FRAME_LEN};

/// Consecutive zero bytes that make a sync marker.
const SYNC_RUN: u8 = 2;

/// Private parse state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    /// Counting consecutive zero bytes.
    Hunting { zeros: u8 },
    /// Sync seen; gathering payload.
    Collecting {
        bytes: [u8; FRAME_LEN],
        filled: usize,
    },
}

impl SyncState {
    const START: Self = Self::Hunting { zeros: 0 };
}

/// Streaming decoder for `00 00 b0 b1 b2 b3` frames.
#[derive(Debug, Clone)]
pub struct SyncDecoder {
    state: SyncState,
}

impl SyncDecoder {
    /// Create a decoder that is hunting for a sync marker.
    pub const fn new() -> Self {
        Self {
            state: SyncState::START,
        }
    }

    /// Forget any partial sync or frame (new connection).
    pub fn reset(&mut self) {
        self.state = SyncState::START;
    }

    /// `true` while payload bytes are being collected.
    pub fn in_frame(&self) -> bool {
        matches!(self.state, SyncState::Collecting { .. })
    }

    /// Consume one byte; returns a frame when this byte completes one.
    // SAFETY: zeros < SYNC_RUN and filled < FRAME_LEN on entry, so both
    // increments stay far below their type limits.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn push(&mut self, byte: u8) -> Option<CoordinateFrame> {
        match &mut self.state {
            SyncState::Hunting { zeros } => {
                if byte != 0 {
                    *zeros = 0;
                    return None;
                }
                *zeros += 1;
                if *zeros == SYNC_RUN {
                    self.state = SyncState::Collecting {
                        bytes: [0; FRAME_LEN],
                        filled: 0,
                    };
                }
                None
            }
            SyncState::Collecting { bytes, filled } => {
                if let Some(slot) = bytes.get_mut(*filled) {
                    *slot = byte;
                }
                *filled += 1;
                if *filled < FRAME_LEN {
                    return None;
                }
                let frame = CoordinateFrame::from_wire(*bytes);
                self.state = SyncState::START;
                Some(frame)
            }
        }
    }

    /// Decode a chunk, yielding every frame it completes.
    ///
    /// Bytes left over after the last complete frame stay in the decoder and
    /// are continued by the next call.
    pub fn decode<'a>(&'a mut self, chunk: &'a [u8]) -> Frames<'a> {
        Frames {
            decoder: self,
            bytes: chunk.iter(),
        }
    }
}

impl Default for SyncDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`SyncDecoder::decode`].
#[derive(Debug)]
pub struct Frames<'a> {
    decoder: &'a mut SyncDecoder,
    bytes: core::slice::Iter<'a, u8>,
}

impl Iterator for Frames<'_> {
    type Item = CoordinateFrame;

    fn next(&mut self) -> Option<Self::Item> {
        self.bytes.by_ref().find_map(|&b| self.decoder.push(b))
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Vec<CoordinateFrame> {
        SyncDecoder::new().decode(bytes).collect()
    }

    #[test]
    fn sync_then_payload_yields_frame() {
        let frames = decode_all(&[0x00, 0x00, 0x00, 0x00, 0x3F, 0x3F]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].raw_x(), 0);
        assert_eq!(frames[0].raw_y(), 0x0FFF);
    }

    #[test]
    fn lone_zero_between_data_does_not_sync() {
        assert!(decode_all(&[0x01, 0x00, 0x02, 0x03, 0x04, 0x05]).is_empty());
    }

    #[test]
    fn zeros_inside_payload_are_data() {
        // Payload 00 00 00 00 must not be read as two more sync markers.
        let stream = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x06, 0x07, 0x08];
        let frames = decode_all(&stream);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].bytes(), [0, 0, 0, 0]);
        assert_eq!(frames[1].bytes(), [5, 6, 7, 8]);
    }

    #[test]
    fn third_zero_starts_payload() {
        let frames = decode_all(&[0x00, 0x00, 0x00, 0x01, 0x02, 0x03]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes(), [0, 1, 2, 3]);
    }

    #[test]
    fn garbage_before_sync_is_skipped() {
        let frames = decode_all(&[0x3F, 0x12, 0x00, 0x07, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes(), [1, 2, 3, 4]);
    }

    #[test]
    fn frame_split_across_chunks() {
        let mut decoder = SyncDecoder::new();
        assert_eq!(decoder.decode(&[0x00]).count(), 0);
        assert_eq!(decoder.decode(&[0x00, 0x01]).count(), 0);
        assert!(decoder.in_frame());
        let frames: Vec<_> = decoder.decode(&[0x02, 0x03, 0x04, 0x00]).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes(), [1, 2, 3, 4]);
        assert!(!decoder.in_frame());
    }

    #[test]
    fn reset_drops_partial_frame() {
        let mut decoder = SyncDecoder::new();
        assert_eq!(decoder.decode(&[0x00, 0x00, 0x01, 0x02]).count(), 0);
        decoder.reset();
        assert_eq!(decoder.decode(&[0x03, 0x04]).count(), 0);
        assert!(!decoder.in_frame());
    }
}
