//! Window state the application can read and change
//!
//! The engine is headless: this is the state a windowing backend would
//! mirror, not a window handle.

use crate::core::config::WindowConfig;
use crate::render::Color;

/// Title, size and clear colour of the main window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    title: String,
    width: u32,
    height: u32,
    focused: bool,
    /// Colour the frame is cleared to
    pub background_color: Color,
}

impl WindowState {
    /// Window state from bootstrap settings
    pub fn from_config(config: &WindowConfig) -> Self {
        Self {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            focused: true,
            background_color: config.background_color,
        }
    }

    /// Window title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the window title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize. A zero dimension (minimised window) is kept as is.
    pub fn set_size(&mut self, width: u32, height: u32) {
        log::debug!("Window resized to {width}x{height}");
        self.width = width;
        self.height = height;
    }

    /// Width over height, or 1 while minimised
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Whether the window has input focus
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self::from_config(&WindowConfig::default())
    }
}
