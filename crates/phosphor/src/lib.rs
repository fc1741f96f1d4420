//! Persistent-phosphor framebuffer
//!
//! A square grid of beam intensities. The decoder lights cells at full
//! brightness as samples arrive; the display thread fades every lit cell by a
//! fixed [`DecayStep`] once per tick. A point plotted once therefore glows for
//! [`DecayStep::ticks_to_black`] ticks and then goes dark, which is the
//! afterglow a CRT vector display shows.
//!
//! ```
//! use phosphor::{DecayStep, PhosphorBuffer, MAX_INTENSITY};
//!
//! let fb = PhosphorBuffer::new(512, DecayStep::default()).unwrap();
//! fb.plot(10, 20, MAX_INTENSITY);
//! for _ in 0..fb.ticks_to_black() {
//!     fb.decay_tick();
//! }
//! assert_eq!(fb.intensity(10, 20), 0);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod decay;

pub use buffer::{BufferError, PhosphorBuffer};
pub use decay::{DecayStep, ZeroDecayStep, DEFAULT_DECAY_STEP};

/// Brightest value a cell can hold: the green channel of the beam colour.
pub const MAX_INTENSITY: u8 = 0xF8;
