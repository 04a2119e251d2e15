//! Basic drawing types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// An 8-bit RGBA color with straight (non-premultiplied) alpha.
///
/// Colors serialize as hex strings, so configuration files can write
/// `background = "#202020"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a color from RGBA components.
    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components.
    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from a 32-bit RGBA value (0xRRGGBBAA).
    #[inline]
    pub const fn from_u32(rgba: u32) -> Self {
        Self {
            r: (rgba >> 24) as u8,
            g: (rgba >> 16) as u8,
            b: (rgba >> 8) as u8,
            a: rgba as u8,
        }
    }

    /// Create a color from a hex string (`"#FF0000"`, `"FF0000"` or
    /// `"#FF000080"`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Return the same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Check whether the color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Convert to an `image` pixel.
    #[inline]
    pub const fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }

    /// Convert from an `image` pixel.
    #[inline]
    pub const fn from_pixel(pixel: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Self { r, g, b, a }
    }

    // Predefined colors

    pub const TRANSPARENT: Self = Self::from_rgba8(0, 0, 0, 0);
    pub const BLACK: Self = Self::from_rgb8(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb8(255, 255, 255);
    pub const RED: Self = Self::from_rgb8(255, 0, 0);
    pub const GREEN: Self = Self::from_rgb8(0, 255, 0);
    pub const BLUE: Self = Self::from_rgb8(0, 0, 255);
    pub const GRAY: Self = Self::from_rgb8(128, 128, 128);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| RenderError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// How source pixels combine with destination pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source pixels replace destination pixels, alpha included.
    Opaque,
    /// Source-over alpha blending.
    #[default]
    Alpha,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF8000"), Some(Color::from_rgb8(255, 128, 0)));
        assert_eq!(Color::from_hex("ff8000"), Some(Color::from_rgb8(255, 128, 0)));
        assert_eq!(
            Color::from_hex("#10203040"),
            Some(Color::from_rgba8(0x10, 0x20, 0x30, 0x40))
        );
        assert_eq!(Color::from_hex("#FFF"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::from_hex("#ééé"), None);
    }

    #[test]
    fn test_display_round_trips() {
        assert_eq!(Color::RED.to_string(), "#FF0000");
        assert_eq!(Color::BLUE.with_alpha(0x80).to_string(), "#0000FF80");
        assert_eq!("#0000FF80".parse::<Color>().unwrap(), Color::BLUE.with_alpha(0x80));
        assert!("nope".parse::<Color>().is_err());
    }

    #[test]
    fn test_from_u32() {
        assert_eq!(Color::from_u32(0x11223344), Color::from_rgba8(0x11, 0x22, 0x33, 0x44));
    }
}
