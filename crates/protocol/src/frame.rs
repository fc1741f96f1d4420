//! Coordinate frames
//!
//! A frame is the four bytes that follow a sync marker. Only the low six bits
//! of each byte carry data; the upper two are framing bits on the device side
//! and are masked off here, never validated. There is no checksum.

/// Two consecutive zero bytes announce a frame.
pub const SYNC_MARKER: [u8; 2] = [0x00, 0x00];

/// Payload bytes per frame.
pub const FRAME_LEN: usize = 4;

/// Significant bits of each payload byte.
pub const PAYLOAD_MASK: u8 = 0x3F;

/// Largest raw coordinate a frame can carry (two 6-bit halves).
pub const RAW_MAX: u16 = 0x0FFF;

/// One decoded beam sample, masked to its significant bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateFrame {
    bytes: [u8; FRAME_LEN],
}

impl CoordinateFrame {
    /// Build a frame from the four payload bytes as received.
    ///
    /// Framing bits are discarded: `0xFF` and `0x3F` decode identically.
    pub fn from_wire(raw: [u8; FRAME_LEN]) -> Self {
        Self {
            bytes: raw.map(|b| b & PAYLOAD_MASK),
        }
    }

    /// Build a frame from raw coordinates, as the device would send them.
    ///
    /// Values are truncated to 12 bits.
    #[allow(clippy::cast_possible_truncation)] // Safety: every value is masked to 6 bits first
    pub fn from_raw(raw_x: u16, raw_y: u16) -> Self {
        let lo = |v: u16| (v & u16::from(PAYLOAD_MASK)) as u8;
        let hi = |v: u16| ((v >> 6) & u16::from(PAYLOAD_MASK)) as u8;
        Self {
            bytes: [lo(raw_x), hi(raw_x), lo(raw_y), hi(raw_y)],
        }
    }

    /// Masked payload bytes.
    pub fn bytes(&self) -> [u8; FRAME_LEN] {
        self.bytes
    }

    /// Raw X: `b0 | b1 << 6`.
    pub fn raw_x(&self) -> u16 {
        let [b0, b1, _, _] = self.bytes;
        u16::from(b0) | (u16::from(b1) << 6)
    }

    /// Raw Y: `b2 | b3 << 6`.
    pub fn raw_y(&self) -> u16 {
        let [_, _, b2, b3] = self.bytes;
        u16::from(b2) | (u16::from(b3) << 6)
    }

    /// Sync marker plus payload, ready to write to a stream.
    pub fn to_wire(&self) -> [u8; 6] {
        let [b0, b1, b2, b3] = self.bytes;
        let [s0, s1] = SYNC_MARKER;
        [s0, s1, b0, b1, b2, b3]
    }
}
