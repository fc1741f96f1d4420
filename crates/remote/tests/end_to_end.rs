//! End-to-end runs: a fake device on a loopback socket or an in-memory script,
//! the decode thread, and the display loop with the headless renderer.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use display::{DisplayEvent, HeadlessRenderer};
use phosphor::{DecayStep, MAX_INTENSITY};
use protocol::{CoordinateFrame, DisplayGeometry, Magnification, SwitchKey};
use remote::transport::{tcp, MemorySink, MemorySource, TransportError};
use remote::{ClientError, DecodeTask, Session, SessionEnd, SharedState};

/// Ten samples whose 2×2 footprints do not overlap at magnification 1.
fn spaced_frames() -> Vec<CoordinateFrame> {
    (0..10u16).map(|i| CoordinateFrame::from_raw(i * 8, 0)).collect()
}

/// Listener plus a device thread that sends `frames` and optionally hangs up.
fn device(frames: Vec<CoordinateFrame>, hang_up: bool) -> (u16, thread::JoinHandle<TcpStream>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let bytes: Vec<u8> = frames.iter().flat_map(CoordinateFrame::to_wire).collect();
        stream.write_all(&bytes).unwrap();
        if hang_up {
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }
        stream
    });
    (port, handle)
}

fn press(key: SwitchKey, repeat: bool) -> DisplayEvent {
    DisplayEvent::Switch {
        key,
        pressed: true,
        repeat,
    }
}

fn release(key: SwitchKey) -> DisplayEvent {
    DisplayEvent::Switch {
        key,
        pressed: false,
        repeat: false,
    }
}

#[test]
fn decode_task_plots_every_frame_from_socket() {
    let (port, device) = device(spaced_frames(), true);
    let (source, _sink) = tcp::connect("127.0.0.1", port, Duration::from_millis(50)).unwrap();

    let geometry = DisplayGeometry::new(Magnification::X1);
    let state = Arc::new(SharedState::new(geometry.size(), DecayStep::default()).unwrap());
    let result = DecodeTask::new(source, geometry, Arc::clone(&state)).run();

    assert!(matches!(result, Err(TransportError::Closed)));
    assert_eq!(state.frames(), 10);
    // Nothing decays without the display loop.
    assert_eq!(state.buffer().cells_at_max(), 40);
    assert_eq!(state.buffer().lit_cells(), 40);
    device.join().unwrap();
}

#[test]
fn oracle_frame_lights_centre_cells() {
    let state = Arc::new(SharedState::new(1024, DecayStep::default()).unwrap());
    let source = MemorySource::new([vec![0x00, 0x00, 0x00, 0x00, 0x3F, 0x3F]]);
    let _ = DecodeTask::new(source, DisplayGeometry::new(Magnification::X2), Arc::clone(&state)).run();
    for (x, y) in [(512, 513), (513, 513), (512, 514), (513, 514)] {
        assert_eq!(state.buffer().intensity(x, y), MAX_INTENSITY);
    }
}

#[test]
fn peer_hang_up_ends_session_with_stream_error() {
    let (port, device) = device(spaced_frames(), true);
    let (source, sink) = tcp::connect("127.0.0.1", port, Duration::from_millis(50)).unwrap();

    let session = Session::with_geometry(DisplayGeometry::default(), DecayStep::default()).unwrap();
    let mut renderer = HeadlessRenderer::new();
    let result = session.run(&mut renderer, source, sink);

    assert!(matches!(result, Err(ClientError::Stream(TransportError::Closed))));
    assert_eq!(session.state().frames(), 10);
    assert!(renderer.presents() > 0);
    device.join().unwrap();
}

#[test]
fn close_request_stops_both_threads() {
    let (port, device) = device(spaced_frames(), false);
    let (source, sink) = tcp::connect("127.0.0.1", port, Duration::from_secs(1)).unwrap();

    let session = Session::with_geometry(DisplayGeometry::default(), DecayStep::default()).unwrap();
    let mut renderer = HeadlessRenderer::new().close_after(20);
    let started = Instant::now();
    let result = session.run(&mut renderer, source, sink).unwrap();

    assert_eq!(result, SessionEnd::Closed);
    assert!(session.state().shutdown().is_requested());
    // Closing the sink wakes the reader well before its read timeout.
    assert!(started.elapsed() < Duration::from_secs(1));

    // The device sees the client hang up.
    let mut stream = device.join().unwrap();
    let mut buf = [0u8; 1];
    assert!(matches!(stream.read(&mut buf), Ok(0) | Err(_)));
}

#[test]
fn key_transitions_send_switch_register() {
    let source = MemorySource::new(Vec::new()).then_silence(Duration::from_millis(1));
    let sink = MemorySink::new();
    let log = sink.log();

    let mut renderer = HeadlessRenderer::new().close_after(3);
    renderer.push_event_at(1, press(SwitchKey::Digit1, false));
    renderer.push_event_at(1, press(SwitchKey::Digit1, true));
    renderer.push_event_at(1, press(SwitchKey::Digit4, false));
    renderer.push_event_at(2, release(SwitchKey::Digit1));
    renderer.push_event_at(2, press(SwitchKey::Ship2Pair, false));
    renderer.push_event_at(2, press(SwitchKey::Digit6, false));

    let session = Session::with_geometry(DisplayGeometry::default(), DecayStep::default()).unwrap();
    let end = session.run(&mut renderer, source, sink).unwrap();

    assert_eq!(end, SessionEnd::Closed);
    assert_eq!(
        log.messages(),
        vec![
            vec![0x00, 0x80],
            vec![0x00, 0x90],
            vec![0x00, 0x10],
            vec![0x00, 0x16],
            // Key 6 is held in the register but not transmitted.
            vec![0x00, 0x16],
        ]
    );
    assert!(log.is_closed());
}

#[test]
fn failed_send_is_fatal() {
    let source = MemorySource::new(Vec::new()).then_silence(Duration::from_millis(1));
    let mut renderer = HeadlessRenderer::new().close_after(100);
    renderer.push_event_at(1, press(SwitchKey::Digit9, false));

    let session = Session::with_geometry(DisplayGeometry::default(), DecayStep::default()).unwrap();
    let result = session.run(&mut renderer, source, MemorySink::failing());

    assert!(matches!(result, Err(ClientError::Stream(TransportError::Io(_)))));
    assert!(session.state().shutdown().is_requested());
}

#[test]
fn plotted_points_fade_out_on_the_display() {
    let frame = CoordinateFrame::from_raw(100, 100);
    let source = MemorySource::from_frames([frame]).then_silence(Duration::from_millis(1));
    let step = DecayStep::default();
    let mut renderer = HeadlessRenderer::new().close_after(u64::from(step.ticks_to_black()) * 8);

    let session = Session::with_geometry(DisplayGeometry::default(), step)
        .unwrap()
        .tick_interval(Duration::from_millis(1));
    session.run(&mut renderer, source, MemorySink::new()).unwrap();

    assert_eq!(session.state().frames(), 1);
    assert_eq!(renderer.last_lit_cells(), 0);
    assert_eq!(session.state().buffer().lit_cells(), 0);
}

#[test]
fn status_line_reports_peer() {
    let source = MemorySource::from_frames(spaced_frames()).then_silence(Duration::from_millis(1));
    let mut renderer = HeadlessRenderer::new();
    // Close once a status line has been published.
    renderer.push_event_at(700, DisplayEvent::CloseRequested);

    let session = Session::with_geometry(DisplayGeometry::default(), DecayStep::default())
        .unwrap()
        .peer("pdp8:2222");
    session.run(&mut renderer, source, MemorySink::new()).unwrap();

    let status = renderer.status().unwrap();
    assert!(status.starts_with("VC8 Display — pdp8:2222 — "), "{status}");
    assert!(status.ends_with(" frames/s"), "{status}");
}
