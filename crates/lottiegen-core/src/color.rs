use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color with f64 components in [0.0, 1.0], as the animation document
/// stores them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Create a new RGBA color.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 1.0).
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from the composition runtime's byte layout.
    pub fn from_argb8(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self::rgba(
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0,
            a as f64 / 255.0,
        )
    }

    /// Create a color from a hex string ("#RRGGBB" or "#AARRGGBB").
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let hex = hex.trim_start_matches('#');
        let byte = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or(ColorError::InvalidHex)
        };
        match hex.len() {
            6 => Ok(Self::from_argb8(255, byte(0..2)?, byte(2..4)?, byte(4..6)?)),
            8 => Ok(Self::from_argb8(
                byte(0..2)?,
                byte(2..4)?,
                byte(4..6)?,
                byte(6..8)?,
            )),
            _ => Err(ColorError::InvalidHex),
        }
    }

    /// Convert to the `[a, r, g, b]` byte layout the composition runtime uses.
    pub fn to_argb8(&self) -> [u8; 4] {
        let byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        [byte(self.a), byte(self.r), byte(self.g), byte(self.b)]
    }

    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, r, g, b] = self.to_argb8();
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", a, r, g, b)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color string")]
    InvalidHex,
}
