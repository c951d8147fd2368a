//! RGBA colour used by window clear colour, mesh tints and text

use serde::{Deserialize, Serialize};

/// Linear RGBA colour with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque colour from RGB components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour from RGBA components
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from hue, saturation and value, all in `[0, 1]`.
    ///
    /// Hue wraps around, so `1.25` is the same as `0.25`.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let saturation = saturation.clamp(0.0, 1.0);
        let value = value.clamp(0.0, 1.0);
        if saturation == 0.0 {
            return Self::rgb(value, value, value);
        }

        let hue = hue.rem_euclid(1.0) * 6.0;
        let sector = hue.floor();
        let f = hue - sector;
        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * f);
        let t = value * (1.0 - saturation * (1.0 - f));

        // sector is in 0..6; 6 only appears through float rounding and wraps to red
        match sector as u8 % 6 {
            0 => Self::rgb(value, t, p),
            1 => Self::rgb(q, value, p),
            2 => Self::rgb(p, value, t),
            3 => Self::rgb(p, q, value),
            4 => Self::rgb(t, p, value),
            _ => Self::rgb(value, p, q),
        }
    }

    /// Components as `[r, g, b, a]`
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
