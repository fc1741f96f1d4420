//! Display surface for the phosphor framebuffer
//!
//! The display loop talks to a [`Renderer`]: it presents the current
//! [`PhosphorBuffer`](phosphor::PhosphorBuffer) once per tick and drains the
//! [`DisplayEvent`]s that arrived since the last one.
//!
//! - [`PhosphorWindow`]: a real window (winit + softbuffer). Not built with
//!   the `headless` feature.
//! - [`HeadlessRenderer`]: no window; replays scripted events. Used by tests
//!   and by `--headless` runs.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
mod headless;
pub mod input;
pub mod palette;
mod renderer;

#[cfg(not(feature = "headless"))]
mod window;

pub use config::WindowConfig;
pub use headless::HeadlessRenderer;
pub use input::{InputEvents, InputQueue};
pub use renderer::{DisplayEvent, RenderError, Renderer};

#[cfg(not(feature = "headless"))]
pub use window::PhosphorWindow;
