//! Screen-space text component

use crate::assets::FontHandle;
use crate::ecs::component::Component;
use crate::foundation::math::Vec2;
use crate::render::Color;

/// A line of text drawn in screen space
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// String to draw
    pub text: String,
    /// Font to draw it with
    pub font: FontHandle,
    /// Text colour
    pub color: Color,
    /// Baseline origin in pixels from the bottom-left corner
    pub position: Vec2,
    /// Multiplier on the font's pixel size
    pub scale: f32,
}

impl Text {
    /// White text at the origin
    pub fn new(font: FontHandle, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font,
            color: Color::WHITE,
            position: Vec2::zeros(),
            scale: 1.0,
        }
    }

    /// Builder: set the colour
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Builder: set the screen position
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    /// Replace the string
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Component for Text {
    fn name(&self) -> &'static str {
        "Text"
    }
}
