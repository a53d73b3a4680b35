//! Window management using winit

use std::sync::Arc;
use winit::{
    dpi::PhysicalSize,
    error::OsError,
    event::WindowEvent,
    event_loop::EventLoop,
    window::{CursorGrabMode, Window as WinitWindow, WindowBuilder},
};

/// Wrapper around winit window with additional state
pub struct Window {
    window: Arc<WinitWindow>,
    base_title: String,
    width: u32,
    height: u32,
    resized: bool,
    cursor_grabbed: bool,
}

impl Window {
    /// Create a new window with the given title and dimensions
    pub fn new(event_loop: &EventLoop<()>, title: &str, width: u32, height: u32) -> Result<Self, OsError> {
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(width, height))
                .build(event_loop)?,
        );

        let size = window.inner_size();
        Ok(Self {
            window,
            base_title: title.to_string(),
            width: size.width,
            height: size.height,
            resized: false,
            cursor_grabbed: false,
        })
    }

    /// Shared handle for backend initialization
    pub fn window_arc(&self) -> Arc<WinitWindow> {
        Arc::clone(&self.window)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns true once per resize
    pub fn take_resized(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }

    /// Show extra state after the base title
    pub fn set_status(&self, status: &str) {
        self.window.set_title(&format!("{} - {}", self.base_title, status));
    }

    /// Hide and confine the cursor while looking around
    pub fn set_cursor_grabbed(&mut self, grabbed: bool) {
        if grabbed == self.cursor_grabbed {
            return;
        }
        let mode = if grabbed {
            CursorGrabMode::Confined
        } else {
            CursorGrabMode::None
        };
        if let Err(e) = self.window.set_cursor_grab(mode) {
            log::debug!("Cursor grab not supported: {}", e);
        }
        self.window.set_cursor_visible(!grabbed);
        self.cursor_grabbed = grabbed;
    }

    /// Track size changes
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Resized(size) = event {
            self.width = size.width;
            self.height = size.height;
            self.resized = true;
        }
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
