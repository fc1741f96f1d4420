//! Window-less renderer

use std::collections::VecDeque;

use phosphor::PhosphorBuffer;
use tracing::trace;

use crate::renderer::{DisplayEvent, RenderError, Renderer};

/// Renderer that draws nowhere.
///
/// Events are released once a given number of frames has been presented, so a
/// test can script "press `1` after the second frame, close after the tenth".
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    scripted: VecDeque<(u64, DisplayEvent)>,
    close_after: Option<u64>,
    close_sent: bool,
    presents: u64,
    last_lit_cells: usize,
    last_max_cells: usize,
    status: Option<String>,
}

impl HeadlessRenderer {
    /// Renderer with no events that never asks to close.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request close once `presents` frames have been shown.
    #[must_use]
    pub fn close_after(mut self, presents: u64) -> Self {
        self.close_after = Some(presents);
        self
    }

    /// Queue an event for the next poll.
    pub fn push_event(&mut self, event: DisplayEvent) {
        self.push_event_at(0, event);
    }

    /// Queue an event to be released after `presents` frames.
    ///
    /// Events are released in the order they were queued.
    pub fn push_event_at(&mut self, presents: u64, event: DisplayEvent) {
        self.scripted.push_back((presents, event));
    }

    /// Frames presented so far.
    pub fn presents(&self) -> u64 {
        self.presents
    }

    /// Non-zero cells in the last presented frame.
    pub fn last_lit_cells(&self) -> usize {
        self.last_lit_cells
    }

    /// Full-intensity cells in the last presented frame.
    pub fn last_max_cells(&self) -> usize {
        self.last_max_cells
    }

    /// Last status published by the display loop.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

impl Renderer for HeadlessRenderer {
    fn present(&mut self, frame: &PhosphorBuffer) -> Result<(), RenderError> {
        self.presents = self.presents.saturating_add(1);
        self.last_lit_cells = frame.lit_cells();
        self.last_max_cells = frame.cells_at_max();
        trace!(presents = self.presents, lit = self.last_lit_cells, "headless present");
        Ok(())
    }

    fn poll_event(&mut self) -> Option<DisplayEvent> {
        if let Some(&(due, event)) = self.scripted.front() {
            if due <= self.presents {
                self.scripted.pop_front();
                return Some(event);
            }
        }
        match self.close_after {
            Some(limit) if !self.close_sent && self.presents >= limit => {
                self.close_sent = true;
                Some(DisplayEvent::CloseRequested)
            }
            _ => None,
        }
    }

    fn set_status(&mut self, status: &str) {
        self.status = Some(status.to_owned());
    }
}
