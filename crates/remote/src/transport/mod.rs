//! Byte source and control sink seams
//!
//! The decode thread reads through a [`ByteSource`]; the display loop writes
//! the switch register through a [`ControlSink`]. A TCP connection provides
//! both halves of one socket ([`tcp::connect`]); [`memory`] provides scripted
//! halves for tests and replays.

use std::io;

use thiserror::Error;

pub mod memory;
pub mod tcp;

pub use memory::{MemorySink, MemorySource, SinkLog};
pub use tcp::{TcpSink, TcpSource};

/// Outcome of a successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// This many bytes were written to the front of the buffer (never zero).
    Bytes(usize),
    /// Nothing arrived within the read timeout.
    WouldBlock,
}

/// Fatal stream errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer closed the connection.
    #[error("connection closed by peer")]
    Closed,

    /// Any other I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Connection setup errors.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Host name lookup failed.
    #[error("cannot resolve {host}: {source}")]
    Resolve {
        /// Host as given.
        host: String,
        /// Resolver error.
        #[source]
        source: io::Error,
    },

    /// The host resolved to no addresses.
    #[error("{host} has no addresses")]
    NoAddress {
        /// Host as given.
        host: String,
    },

    /// Every resolved address refused or timed out.
    #[error("cannot connect to {addr}: {source}")]
    Connect {
        /// Last address tried.
        addr: String,
        /// Error from the last attempt.
        #[source]
        source: io::Error,
    },

    /// Socket options or handle duplication failed.
    #[error("cannot configure socket: {0}")]
    Configure(#[source] io::Error),
}

/// Inbound half of a connection. Owned by the decode thread.
pub trait ByteSource: Send {
    /// Read whatever is available into `buf`.
    ///
    /// Returns [`Received::WouldBlock`] when the read timeout expires with no
    /// data, so the caller can check for shutdown.
    ///
    /// # Errors
    ///
    /// [`TransportError::Closed`] on orderly close; any other failure as
    /// [`TransportError::Io`].
    fn receive(&mut self, buf: &mut [u8]) -> Result<Received, TransportError>;
}

/// Outbound half of a connection. Owned by the display loop.
pub trait ControlSink {
    /// Write a complete control message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the message cannot be written; the
    /// session treats this as fatal.
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Shut the connection down. A `receive` blocked on the same connection
    /// returns promptly.
    fn close(&mut self);
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn receive(&mut self, buf: &mut [u8]) -> Result<Received, TransportError> {
        (**self).receive(buf)
    }
}

impl<T: ControlSink + ?Sized> ControlSink for Box<T> {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).send(bytes)
    }

    fn close(&mut self) {
        (**self).close();
    }
}
