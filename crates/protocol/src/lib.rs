//! Wire protocol for the VC8 remote display
//!
//! The device streams beam positions as an unframed byte sequence. Every
//! sample is a two-byte sync marker followed by four payload bytes:
//!
//! ```text
//! 0x00 0x00 <b0> <b1> <b2> <b3>
//!           \_____/   \_____/
//!            raw X     raw Y      (low 6 bits of each byte, little end first)
//! ```
//!
//! In the other direction the client reports the switch register (the
//! Spacewar! control keys) as a two-byte message per key transition.
//!
//! # Modules
//!
//! - [`frame`] - [`CoordinateFrame`] masking and 12-bit coordinate assembly
//! - [`decoder`] - [`SyncDecoder`], the sans-io sync/frame state machine
//! - [`transform`] - device range to display grid, [`PlotPoint`] footprints
//! - [`switches`] - [`SwitchRegister`] and its outbound encoding
//!
//! # Example
//!
//! ```
//! use protocol::{DisplayGeometry, Magnification, SyncDecoder};
//!
//! let geometry = DisplayGeometry::new(Magnification::X1);
//! let mut decoder = SyncDecoder::new();
//!
//! let frames: Vec<_> = decoder.decode(&[0x00, 0x00, 0x00, 0x00, 0x3F, 0x3F]).collect();
//! assert_eq!(frames.len(), 1);
//! assert_eq!(geometry.project(frames[0]), (256, 256));
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
#![warn(clippy::print_stdout)] // prefer tracing in the binary over println! in lib code
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod decoder;
pub mod frame;
pub mod switches;
pub mod transform;

pub use decoder::{Frames, SyncDecoder};
pub use frame::{CoordinateFrame, FRAME_LEN, PAYLOAD_MASK, SYNC_MARKER};
pub use switches::{SwitchKey, SwitchRegister};
pub use transform::{ConfigError, DisplayGeometry, Magnification, PlotPoint};
