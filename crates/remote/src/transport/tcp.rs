//! TCP transport
//!
//! One socket, two handles: the reader goes to the decode thread, a clone of
//! it stays with the display loop for the switch register. Shutting the
//! socket down from the sink side wakes a blocked reader.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info};

use super::{ByteSource, ConnectError, ControlSink, Received, TransportError};

/// Inbound half of a TCP connection.
#[derive(Debug)]
pub struct TcpSource {
    stream: TcpStream,
}

/// Outbound half of a TCP connection.
#[derive(Debug)]
pub struct TcpSink {
    stream: TcpStream,
    peer: Option<SocketAddr>,
}

impl TcpSink {
    /// Remote address, if the socket still knows it.
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }
}

/// Resolve `host` and connect to the first address that accepts.
///
/// # Errors
///
/// [`ConnectError::Resolve`] or [`ConnectError::NoAddress`] if the name does
/// not resolve, [`ConnectError::Connect`] if every address fails.
pub fn connect(
    host: &str,
    port: u16,
    read_timeout: Duration,
) -> Result<(TcpSource, TcpSink), ConnectError> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ConnectError::Resolve {
            host: host.to_owned(),
            source,
        })?;

    let mut last_error = None;
    for addr in addrs {
        debug!(%addr, "connecting");
        match TcpStream::connect(addr) {
            Ok(stream) => {
                info!(%addr, "connected");
                return from_stream(stream, read_timeout);
            }
            Err(source) => {
                debug!(%addr, error = %source, "connect attempt failed");
                last_error = Some((addr, source));
            }
        }
    }

    Err(match last_error {
        Some((addr, source)) => ConnectError::Connect {
            addr: addr.to_string(),
            source,
        },
        None => ConnectError::NoAddress {
            host: host.to_owned(),
        },
    })
}

/// Split an already connected stream into source and sink.
///
/// Sets `TCP_NODELAY` and the read timeout used for shutdown polling. The same
/// duration bounds writes, so a peer that stops draining cannot wedge the
/// display loop in a switch-register send.
///
/// # Errors
///
/// [`ConnectError::Configure`] if a socket option cannot be set or the handle
/// cannot be duplicated.
pub fn from_stream(
    stream: TcpStream,
    read_timeout: Duration,
) -> Result<(TcpSource, TcpSink), ConnectError> {
    stream.set_nodelay(true).map_err(ConnectError::Configure)?;
    stream
        .set_read_timeout(Some(read_timeout))
        .map_err(ConnectError::Configure)?;
    stream
        .set_write_timeout(Some(read_timeout))
        .map_err(ConnectError::Configure)?;
    let peer = stream.peer_addr().ok();
    let writer = stream.try_clone().map_err(ConnectError::Configure)?;
    Ok((
        TcpSource { stream },
        TcpSink {
            stream: writer,
            peer,
        },
    ))
}

impl ByteSource for TcpSource {
    fn receive(&mut self, buf: &mut [u8]) -> Result<Received, TransportError> {
        match self.stream.read(buf) {
            Ok(0) => Err(TransportError::Closed),
            Ok(n) => Ok(Received::Bytes(n)),
            // Timeout surfaces as WouldBlock on Unix and TimedOut on Windows.
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(Received::WouldBlock)
            }
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}

impl ControlSink for TcpSink {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(bytes)?;
        Ok(())
    }

    fn close(&mut self) {
        if let Err(error) = self.stream.shutdown(Shutdown::Both) {
            // Already closed by the peer.
            debug!(%error, "socket shutdown");
        }
    }
}
