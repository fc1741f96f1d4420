//! Decay step newtype
//!
//! - `DecayStep`: 1–255, the intensity every lit cell loses per tick

use thiserror::Error;

use crate::MAX_INTENSITY;

/// Step used when none is configured: the fade constant of the VC8 client.
pub const DEFAULT_DECAY_STEP: u8 = 8;

/// A zero step would leave every cell lit forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("decay step must be at least 1")]
pub struct ZeroDecayStep;

/// Intensity removed from each lit cell per tick.
///
/// Wraps a `u8` with the invariant `value >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DecayStep(u8);

impl DecayStep {
    /// Create a `DecayStep`, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`ZeroDecayStep`] if `value == 0`.
    pub fn new(value: u8) -> Result<Self, ZeroDecayStep> {
        if value == 0 {
            Err(ZeroDecayStep)
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner step (1–255).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Ticks for a fully plotted cell to reach zero: `ceil(MAX_INTENSITY / step)`.
    #[must_use]
    pub fn ticks_to_black(self) -> u32 {
        u32::from(MAX_INTENSITY).div_ceil(u32::from(self.0))
    }
}

impl Default for DecayStep {
    fn default() -> Self {
        Self(DEFAULT_DECAY_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_step_is_rejected() {
        assert_eq!(DecayStep::new(0), Err(ZeroDecayStep));
        assert_eq!(DecayStep::new(1).map(DecayStep::get), Ok(1));
    }

    #[test]
    fn default_step_fades_in_thirty_one_ticks() {
        assert_eq!(DecayStep::default().get(), 8);
        assert_eq!(DecayStep::default().ticks_to_black(), 31);
    }

    #[test]
    fn ticks_to_black_rounds_up() {
        assert_eq!(DecayStep::new(5).map(DecayStep::ticks_to_black), Ok(50));
        assert_eq!(DecayStep::new(255).map(DecayStep::ticks_to_black), Ok(1));
        assert_eq!(DecayStep::new(1).map(DecayStep::ticks_to_black), Ok(248));
    }
}
