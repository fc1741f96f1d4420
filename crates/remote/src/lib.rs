//! VC8 remote display client
//!
//! Connects to a remote PDP-8 running Spacewar!, decodes the beam-position
//! stream on a background thread and shows it on a persistent-phosphor
//! display. Control keys are sent back as the PDP-8 switch register.
//!
//! ```text
//!   ByteSource ──► vc8-decode thread ──plot──► PhosphorBuffer ◄──decay── DisplayLoop (main)
//!                                                  (Arc)                    │    ▲
//!                                                                   present │    │ events
//!                                                                           ▼    │
//!   ControlSink ◄──────────────── switch register ◄──────────────────── Renderer
//! ```
//!
//! # Modules
//!
//! - [`transport`] - byte source and control sink seams, TCP and in-memory
//! - [`decode`] - [`StreamDecoder`] and the decode thread body
//! - [`display_loop`] - fixed-cadence decay/present/input loop
//! - [`session`] - shared state, shutdown and thread wiring
//! - [`config`] - validated client settings
//! - [`cli`] - command-line parsing
//! - [`logging`] - tracing subscriber setup

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::print_stdout)] // use tracing instead
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod decode;
pub mod display_loop;
pub mod error;
pub mod logging;
pub mod session;
pub mod transport;

pub use config::ClientConfig;
pub use decode::{DecodeTask, StreamDecoder};
pub use display_loop::DisplayLoop;
pub use error::{ClientError, ConfigError};
pub use session::{Session, SessionEnd, SharedState, Shutdown};
pub use transport::{ByteSource, ConnectError, ControlSink, Received, TransportError};
