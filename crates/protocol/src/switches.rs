//! Switch register (client → device)
//!
//! The remote Spacewar! reads the PDP-8 front-panel switch register for ship
//! controls. The client keeps a 12-bit image of it, one bit per held key, and
//! sends it on every key transition as:
//!
//! ```text
//! byte0 = 0x00
//! byte1 = ((sr & 0xF00) >> 4) | (sr & 0x00F)
//! ```
//!
//! Only the top and bottom nibbles travel; bits 4-7 (keys 5-8) are tracked
//! but never leave the client.
//!
//! | Key | Bits  | Key | Bits  |
//! |-----|-------|-----|-------|
//! | `1` | 0x800 | `7` | 0x020 |
//! | `2` | 0x400 | `8` | 0x010 |
//! | `3` | 0x200 | `9` | 0x008 |
//! | `4` | 0x100 | `0` | 0x004 |
//! | `5` | 0x080 | `-` | 0x002 |
//! | `6` | 0x040 | `=` | 0x001 |
//! | `w` | 0x600 | `p` | 0x006 |

/// Width of the switch register.
pub const REGISTER_MASK: u16 = 0x0FFF;

/// Keys that drive the switch register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchKey {
    /// `1` (ship 1, first control)
    Digit1,
    /// `2`
    Digit2,
    /// `3`
    Digit3,
    /// `4`
    Digit4,
    /// `5`
    Digit5,
    /// `6`
    Digit6,
    /// `7`
    Digit7,
    /// `8`
    Digit8,
    /// `9` (ship 2, first control)
    Digit9,
    /// `0`
    Digit0,
    /// `-`
    Minus,
    /// `=`
    Equal,
    /// `w`: ship 1 convenience key, holds bits of `2` and `3`
    Ship1Pair,
    /// `p`: ship 2 convenience key, holds bits of `0` and `-`
    Ship2Pair,
}

impl SwitchKey {
    /// Every key, in register bit order.
    pub const ALL: [Self; 14] = [
        Self::Digit1,
        Self::Digit2,
        Self::Digit3,
        Self::Digit4,
        Self::Digit5,
        Self::Digit6,
        Self::Digit7,
        Self::Digit8,
        Self::Digit9,
        Self::Digit0,
        Self::Minus,
        Self::Equal,
        Self::Ship1Pair,
        Self::Ship2Pair,
    ];

    /// Register bits this key holds while pressed.
    pub const fn bits(self) -> u16 {
        match self {
            Self::Digit1 => 0x800,
            Self::Digit2 => 0x400,
            Self::Digit3 => 0x200,
            Self::Digit4 => 0x100,
            Self::Digit5 => 0x080,
            Self::Digit6 => 0x040,
            Self::Digit7 => 0x020,
            Self::Digit8 => 0x010,
            Self::Digit9 => 0x008,
            Self::Digit0 => 0x004,
            Self::Minus => 0x002,
            Self::Equal => 0x001,
            Self::Ship1Pair => 0x600,
            Self::Ship2Pair => 0x006,
        }
    }
}

/// Held-key image sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwitchRegister(u16);

impl SwitchRegister {
    /// All switches open.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Register from raw bits (truncated to 12).
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & REGISTER_MASK)
    }

    /// Current bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Close the key's switches.
    pub fn press(&mut self, key: SwitchKey) {
        self.0 |= key.bits();
    }

    /// Open the key's switches.
    ///
    /// Releasing a pair key opens both of its bits even when a digit key
    /// sharing one of them is still held.
    pub fn release(&mut self, key: SwitchKey) {
        self.0 &= !key.bits();
    }

    /// Two-byte control message for the current state.
    #[allow(clippy::cast_possible_truncation)] // Safety: the result is at most 0xFF by construction
    pub const fn encode(self) -> [u8; 2] {
        let packed = ((self.0 & 0xF00) >> 4) | (self.0 & 0x00F);
        [0x00, packed as u8]
    }
}
