//! Fixed field palette

use std::fmt;
use serde::{Serialize, Deserialize};

/// An sRGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub const PALETTE: &[Color] = &[
    Color::from_rgb(100, 150, 250), // Blue
    Color::from_rgb(250, 150, 100), // Orange
    Color::from_rgb(150, 250, 100), // Green
    Color::from_rgb(250, 100, 150), // Pink
    Color::from_rgb(150, 100, 250), // Purple
    Color::from_rgb(250, 250, 100), // Yellow
    Color::from_rgb(100, 250, 250), // Cyan
    Color::from_rgb(250, 100, 100), // Red
];

/// Palette color for the `index`-th field, wrapping around
pub fn field_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(field_color(0), field_color(PALETTE.len()));
        assert_eq!(field_color(1).to_hex(), "#fa9664");
    }
}
