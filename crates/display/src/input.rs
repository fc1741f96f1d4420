//! Keyboard input for the phosphor window.
//!
//! - [`InputQueue`]: producer, owned by the winit event handler.
//! - [`InputEvents`]: consumer, drained by the window's `poll_event`.
//!
//! # Key mapping
//!
//! Physical key positions are used, so the layout does not matter.
//!
//! | Key(s)          | Switch key                         |
//! |-----------------|------------------------------------|
//! | `1` … `0`       | [`SwitchKey::Digit1`] … [`SwitchKey::Digit0`] |
//! | `-`, `=`        | [`SwitchKey::Minus`], [`SwitchKey::Equal`] |
//! | `W`             | [`SwitchKey::Ship1Pair`]           |
//! | `P`             | [`SwitchKey::Ship2Pair`]           |

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use protocol::SwitchKey;
use winit::keyboard::KeyCode;

use crate::renderer::DisplayEvent;

/// Maximum number of unread events buffered in the queue.
///
/// Newer events are dropped while the queue is full.
pub const QUEUE_CAP: usize = 64;

/// Producer half of the keyboard-input pipe.
#[derive(Debug)]
pub struct InputQueue {
    queue: Arc<Mutex<VecDeque<DisplayEvent>>>,
}

impl InputQueue {
    /// Create a linked (producer, consumer) pair.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, InputEvents) {
        let q = Arc::new(Mutex::new(VecDeque::new()));
        (InputQueue { queue: q.clone() }, InputEvents { queue: q })
    }

    /// Enqueue an event. Returns `false` if the queue was full and the event dropped.
    pub fn push(&self, event: DisplayEvent) -> bool {
        match self.queue.lock() {
            Ok(mut q) if q.len() < QUEUE_CAP => {
                q.push_back(event);
                true
            }
            _ => false,
        }
    }
}

/// Consumer half of the keyboard-input pipe.
#[derive(Debug)]
pub struct InputEvents {
    queue: Arc<Mutex<VecDeque<DisplayEvent>>>,
}

impl InputEvents {
    /// Oldest unread event.
    pub fn poll(&mut self) -> Option<DisplayEvent> {
        self.queue.lock().ok()?.pop_front()
    }

    /// Number of unread events.
    pub fn len(&self) -> usize {
        self.queue.lock().map_or(0, |q| q.len())
    }

    /// `true` when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map a physical key to the switch key it drives.
///
/// Returns `None` for keys that have no mapping; they are ignored.
pub fn map_key(code: KeyCode) -> Option<SwitchKey> {
    let key = match code {
        KeyCode::Digit1 => SwitchKey::Digit1,
        KeyCode::Digit2 => SwitchKey::Digit2,
        KeyCode::Digit3 => SwitchKey::Digit3,
        KeyCode::Digit4 => SwitchKey::Digit4,
        KeyCode::Digit5 => SwitchKey::Digit5,
        KeyCode::Digit6 => SwitchKey::Digit6,
        KeyCode::Digit7 => SwitchKey::Digit7,
        KeyCode::Digit8 => SwitchKey::Digit8,
        KeyCode::Digit9 => SwitchKey::Digit9,
        KeyCode::Digit0 => SwitchKey::Digit0,
        KeyCode::Minus => SwitchKey::Minus,
        KeyCode::Equal => SwitchKey::Equal,
        KeyCode::KeyW => SwitchKey::Ship1Pair,
        KeyCode::KeyP => SwitchKey::Ship2Pair,
        _ => return None,
    };
    Some(key)
}

/// Build the [`DisplayEvent`] for a key transition, if the key is mapped.
pub fn key_event(code: KeyCode, pressed: bool, repeat: bool) -> Option<DisplayEvent> {
    map_key(code).map(|key| DisplayEvent::Switch {
        key,
        pressed,
        repeat,
    })
}
