//! Isolated window management layer
//!
//! Based on softbuffer pattern: https://github.com/rust-windowing/softbuffer
//! All platform-specific code lives here. The event loop is never run; it is
//! pumped without waiting after every present, so the display loop keeps its
//! own cadence on the calling thread.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use phosphor::PhosphorBuffer;
use softbuffer::{Context, Surface};
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as WinitWindow, WindowAttributes, WindowId};

use crate::config::WindowConfig;
use crate::input::{self, InputEvents, InputQueue};
use crate::palette;
use crate::renderer::{DisplayEvent, RenderError, Renderer};

type WindowSurface = Surface<Arc<WinitWindow>, Arc<WinitWindow>>;

/// Creates the window on the first `resumed`.
struct WindowCreator {
    window_attributes: Option<WindowAttributes>,
    created: Option<Result<(Arc<WinitWindow>, WindowSurface), RenderError>>,
}

impl WindowCreator {
    fn create(
        event_loop: &ActiveEventLoop,
        attributes: WindowAttributes,
    ) -> Result<(Arc<WinitWindow>, WindowSurface), RenderError> {
        let window = Arc::new(event_loop.create_window(attributes)?);
        let context = Context::new(window.clone())?;
        let surface = Surface::new(&context, window.clone())?;
        Ok((window, surface))
    }
}

impl ApplicationHandler for WindowCreator {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(attributes) = self.window_attributes.take() {
            self.created = Some(Self::create(event_loop, attributes));
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// Forwards window events into the input queue.
struct EventHandler {
    input: InputQueue,
    close_requested: bool,
}

impl ApplicationHandler for EventHandler {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        // Window is already created before events are pumped
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                debug!("window close requested");
                self.close_requested = true;
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let pressed = event.state == ElementState::Pressed;
                if let Some(ev) = input::key_event(code, pressed, event.repeat) {
                    if !self.input.push(ev) {
                        warn!(?code, "input queue full, key event dropped");
                    }
                }
            }
            _ => {}
        }
    }
}

/// Non-resizable window showing one pixel per phosphor cell.
pub struct PhosphorWindow {
    event_loop: EventLoop<()>,
    handler: EventHandler,
    events: InputEvents,
    window: Arc<WinitWindow>,
    surface: WindowSurface,
    size: u32,
    close_reported: bool,
}

impl PhosphorWindow {
    /// Open the window and its software surface.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the event loop, window or surface cannot be
    /// created.
    pub fn open(config: &WindowConfig) -> Result<Self, RenderError> {
        let mut event_loop = EventLoop::new()?;

        let window_attributes = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(config.size, config.size))
            .with_resizable(false);

        let mut creator = WindowCreator {
            window_attributes: Some(window_attributes),
            created: None,
        };

        // Pump the event loop once to create the window
        let _ = event_loop.pump_app_events(Some(Duration::from_millis(1)), &mut creator);

        let (window, mut surface) = creator.created.ok_or(RenderError::NoWindow)??;

        let side = NonZeroU32::new(config.size).ok_or(RenderError::ZeroSize)?;
        // Resize surface once during initialization (never resize again)
        surface.resize(side, side)?;

        info!(size = config.size, "display window opened");

        let (input, events) = InputQueue::new();
        Ok(Self {
            event_loop,
            handler: EventHandler {
                input,
                close_requested: false,
            },
            events,
            window,
            surface,
            size: config.size,
            close_reported: false,
        })
    }

    /// Deliver pending OS events to the handler without waiting.
    fn pump(&mut self) {
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler)
        {
            debug!(code, "event loop exited");
            self.handler.close_requested = true;
        }
    }
}

impl Renderer for PhosphorWindow {
    fn present(&mut self, frame: &PhosphorBuffer) -> Result<(), RenderError> {
        if frame.size() != self.size {
            return Err(RenderError::SizeMismatch {
                expected: self.size,
                actual: frame.size(),
            });
        }

        let mut buffer = self.surface.buffer_mut()?;
        palette::fill(frame, &mut buffer);
        buffer.present()?;

        self.pump();
        Ok(())
    }

    fn poll_event(&mut self) -> Option<DisplayEvent> {
        if let Some(event) = self.events.poll() {
            return Some(event);
        }
        if self.handler.close_requested && !self.close_reported {
            self.close_reported = true;
            return Some(DisplayEvent::CloseRequested);
        }
        None
    }

    fn set_status(&mut self, status: &str) {
        self.window.set_title(status);
    }
}
