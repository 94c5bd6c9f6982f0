//! Stroke color handling.

use crate::error::{ScribbleError, ScribbleResult};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Stroke color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl StrokeColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse an `RRGGBBAA` hex string, with or without a leading `#`.
    pub fn parse_hex(hex: &str) -> ScribbleResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = |reason: &str| ScribbleError::InvalidOption {
            field: "stroke_color",
            value: hex.to_string(),
            reason: reason.to_string(),
        };

        if digits.len() != 8 || !digits.is_ascii() {
            return Err(invalid("invalid hex length: must be 8 characters"));
        }

        let channel = |i: usize, name: &str| {
            let pair = &digits[i..i + 2];
            if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid(&format!("invalid {} value", name)));
            }
            u8::from_str_radix(pair, 16).map_err(|_| invalid(&format!("invalid {} value", name)))
        };

        Ok(Self {
            r: channel(0, "red")?,
            g: channel(2, "green")?,
            b: channel(4, "blue")?,
            a: channel(6, "alpha")?,
        })
    }

    /// Uppercase `#RRGGBBAA`.
    pub fn to_hex_rgba(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Uppercase `RRGGBB` without alpha, as written into scribble records.
    pub fn to_hex_rgb(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::white()
    }
}

impl From<Color> for StrokeColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<StrokeColor> for Color {
    fn from(color: StrokeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_with_and_without_hash() {
        let expected = StrokeColor::new(0x12, 0xAB, 0xCD, 0xEF);
        assert_eq!(StrokeColor::parse_hex("#12abcdef").unwrap(), expected);
        assert_eq!(StrokeColor::parse_hex("12ABCDEF").unwrap(), expected);
    }

    #[test]
    fn test_parse_hex_rejects_wrong_length() {
        let err = StrokeColor::parse_hex("#FFFFFF").unwrap_err();
        assert!(matches!(err, ScribbleError::InvalidOption { field: "stroke_color", .. }));
    }

    #[test]
    fn test_parse_hex_rejects_non_hex() {
        let err = StrokeColor::parse_hex("FFGGFFFF").unwrap_err();
        match err {
            ScribbleError::InvalidOption { reason, .. } => assert_eq!(reason, "invalid green value"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_hex_formatting() {
        let color = StrokeColor::new(255, 10, 0, 128);
        assert_eq!(color.to_hex_rgba(), "#FF0A0080");
        assert_eq!(color.to_hex_rgb(), "FF0A00");
    }

    #[test]
    fn test_peniko_roundtrip() {
        let color = StrokeColor::new(1, 2, 3, 4);
        let peniko: Color = color.into();
        assert_eq!(StrokeColor::from(peniko), color);
    }
}
