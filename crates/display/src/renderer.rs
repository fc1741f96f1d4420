//! Renderer seam between the display loop and a surface

use phosphor::PhosphorBuffer;
use protocol::SwitchKey;
use thiserror::Error;

/// Input reported by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// A control key changed state.
    Switch {
        /// Which key.
        key: SwitchKey,
        /// `true` on key-down, `false` on key-up.
        pressed: bool,
        /// Auto-repeat of a key that is already down.
        repeat: bool,
    },
    /// The user asked to close the display.
    CloseRequested,
}

/// Presentation failures. All of them end the session.
///
/// Platform errors are kept as their messages: some backends hold handles
/// that are not `Send`, and this error crosses into `anyhow` in the binary.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The platform event loop could not be created or pumped.
    #[error("event loop error: {0}")]
    EventLoop(String),

    /// The OS refused to create the window.
    #[error("window creation failed: {0}")]
    Window(String),

    /// The event loop ran but never produced a window.
    #[error("window was not created")]
    NoWindow,

    /// A window needs at least one pixel.
    #[error("window size must be non-zero")]
    ZeroSize,

    /// Software surface failure (context, resize, buffer or present).
    #[error("surface error: {0}")]
    Surface(String),

    /// Frame side does not match the surface side.
    #[error("frame is {actual}x{actual} but surface is {expected}x{expected}")]
    SizeMismatch {
        /// Surface side in pixels.
        expected: u32,
        /// Frame side in cells.
        actual: u32,
    },
}

impl From<winit::error::EventLoopError> for RenderError {
    fn from(e: winit::error::EventLoopError) -> Self {
        Self::EventLoop(e.to_string())
    }
}

impl From<winit::error::OsError> for RenderError {
    fn from(e: winit::error::OsError) -> Self {
        Self::Window(e.to_string())
    }
}

impl From<softbuffer::SoftBufferError> for RenderError {
    fn from(e: softbuffer::SoftBufferError) -> Self {
        Self::Surface(e.to_string())
    }
}

/// A surface the display loop can draw on and read input from.
pub trait Renderer {
    /// Show the buffer's current intensities.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the frame cannot be shown; the caller treats
    /// this as fatal.
    fn present(&mut self, frame: &PhosphorBuffer) -> Result<(), RenderError>;

    /// Next pending input event, without blocking.
    fn poll_event(&mut self) -> Option<DisplayEvent>;

    /// Publish a one-line status (window title).
    fn set_status(&mut self, _status: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync + 'static>() {}

    #[test]
    fn render_error_is_send_and_sync() {
        assert_send_sync::<RenderError>();
    }

    #[test]
    fn surface_failure_keeps_its_message() {
        let err = RenderError::from(softbuffer::SoftBufferError::IncompleteDisplayHandle);
        assert!(matches!(err, RenderError::Surface(_)));
        assert!(err.to_string().starts_with("surface error: "));
    }
}
