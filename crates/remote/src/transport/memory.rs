//! In-memory transport for tests and captured-stream replays

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use protocol::CoordinateFrame;

use super::{ByteSource, ControlSink, Received, TransportError};

/// What a [`MemorySource`] does once its chunks run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfScript {
    /// Report an orderly close.
    Close,
    /// Behave like a quiet connection: wait, then report no data.
    Silence(Duration),
}

/// Replays scripted chunks, one per `receive`.
#[derive(Debug)]
pub struct MemorySource {
    chunks: VecDeque<Vec<u8>>,
    end: EndOfScript,
}

impl MemorySource {
    /// Source that yields `chunks` and then closes.
    pub fn new<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            chunks: chunks.into_iter().collect(),
            end: EndOfScript::Close,
        }
    }

    /// Source that sends each frame in its own chunk, sync marker included.
    pub fn from_frames<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = CoordinateFrame>,
    {
        Self::new(frames.into_iter().map(|f| f.to_wire().to_vec()))
    }

    /// Stay open after the script, idling `poll` per read.
    #[must_use]
    pub fn then_silence(mut self, poll: Duration) -> Self {
        self.end = EndOfScript::Silence(poll);
        self
    }

    /// Chunks not yet delivered.
    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

impl ByteSource for MemorySource {
    fn receive(&mut self, buf: &mut [u8]) -> Result<Received, TransportError> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return match self.end {
                EndOfScript::Close => Err(TransportError::Closed),
                EndOfScript::Silence(poll) => {
                    thread::sleep(poll);
                    Ok(Received::WouldBlock)
                }
            };
        };
        if chunk.is_empty() {
            return Ok(Received::WouldBlock);
        }
        let n = chunk.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), chunk.get(..n)) {
            dst.copy_from_slice(src);
        }
        // Whatever did not fit is delivered by the next read.
        if n < chunk.len() {
            self.chunks.push_front(chunk.split_off(n));
        }
        Ok(Received::Bytes(n))
    }
}

#[derive(Debug, Default)]
struct SinkRecord {
    messages: Vec<Vec<u8>>,
    closed: bool,
}

/// Read handle on what a [`MemorySink`] was sent.
#[derive(Debug, Clone, Default)]
pub struct SinkLog {
    record: Arc<Mutex<SinkRecord>>,
}

impl SinkLog {
    /// Every message, in send order.
    pub fn messages(&self) -> Vec<Vec<u8>> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .messages
            .clone()
    }

    /// `true` once the sink has been closed.
    pub fn is_closed(&self) -> bool {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }
}

/// Records control messages instead of sending them.
#[derive(Debug, Default)]
pub struct MemorySink {
    log: SinkLog,
    fail_sends: bool,
}

impl MemorySink {
    /// Sink that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose every send fails as a broken pipe.
    pub fn failing() -> Self {
        Self {
            log: SinkLog::default(),
            fail_sends: true,
        }
    }

    /// Handle for inspecting sent messages after the sink is moved.
    pub fn log(&self) -> SinkLog {
        self.log.clone()
    }
}

impl ControlSink for MemorySink {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe).into());
        }
        let mut record = self.log.record.lock().unwrap_or_else(PoisonError::into_inner);
        if record.closed {
            return Err(TransportError::Closed);
        }
        record.messages.push(bytes.to_vec());
        Ok(())
    }

    fn close(&mut self) {
        self.log
            .record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn chunks_are_delivered_then_closed() {
        let mut source = MemorySource::new([vec![1, 2, 3], vec![4]]);
        let mut buf = [0u8; 8];
        assert!(matches!(source.receive(&mut buf), Ok(Received::Bytes(3))));
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert!(matches!(source.receive(&mut buf), Ok(Received::Bytes(1))));
        assert!(matches!(source.receive(&mut buf), Err(TransportError::Closed)));
    }

    #[test]
    fn oversized_chunk_is_split() {
        let mut source = MemorySource::new([vec![1, 2, 3, 4, 5]]);
        let mut buf = [0u8; 2];
        assert!(matches!(source.receive(&mut buf), Ok(Received::Bytes(2))));
        assert_eq!(source.remaining(), 1);
        assert!(matches!(source.receive(&mut buf), Ok(Received::Bytes(2))));
        assert!(matches!(source.receive(&mut buf), Ok(Received::Bytes(1))));
        assert_eq!(buf[0], 5);
    }

    #[test]
    fn empty_chunk_and_silence_would_block() {
        let mut source = MemorySource::new([vec![]]).then_silence(Duration::ZERO);
        let mut buf = [0u8; 4];
        assert!(matches!(source.receive(&mut buf), Ok(Received::WouldBlock)));
        assert!(matches!(source.receive(&mut buf), Ok(Received::WouldBlock)));
    }

    #[test]
    fn frames_carry_sync_marker() {
        let mut source = MemorySource::from_frames([CoordinateFrame::from_raw(1, 2)]);
        let mut buf = [0xFFu8; 8];
        assert!(matches!(source.receive(&mut buf), Ok(Received::Bytes(6))));
        assert_eq!(&buf[..6], &[0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn sink_records_until_closed() {
        let mut sink = MemorySink::new();
        let log = sink.log();
        sink.send(&[0, 0x80]).unwrap();
        sink.close();
        assert!(matches!(sink.send(&[0, 0]), Err(TransportError::Closed)));
        assert_eq!(log.messages(), vec![vec![0, 0x80]]);
        assert!(log.is_closed());
    }

    #[test]
    fn failing_sink_reports_io_error() {
        let mut sink = MemorySink::failing();
        assert!(matches!(sink.send(&[0, 1]), Err(TransportError::Io(_))));
    }
}
