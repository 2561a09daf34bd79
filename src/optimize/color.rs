//! Hex color handling for tracer styles.

use std::fmt;

use serde::{Serialize, Serializer};

/// Offset of the hex digits in a tracer fill style, `fill:#RRGGBB; ...`.
const FILL_OFFSET: usize = 6;
/// Offset of the hex digits in a centerline style, `stroke:#RRGGBB; ...`.
const STROKE_OFFSET: usize = 8;
const HEX_LEN: usize = 6;

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decode six hex digits, either case.
    pub fn from_hex(text: &str) -> Option<Self> {
        let mut rgb = [0u8; 3];
        hex::decode_to_slice(text, &mut rgb).ok()?;
        Some(Self::new(rgb[0], rgb[1], rgb[2]))
    }

    /// Uppercase hex digits, without `#`.
    pub fn to_hex(self) -> String {
        hex::encode_upper([self.r, self.g, self.b])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Read the color text out of a tracer-written `style` attribute.
///
/// This is a fixed-offset read of the tracer's own output, not a CSS parse.
/// Returns `None` when the style is too short or the digits are not hex.
pub fn extract_color(style: &str, centerline: bool) -> Option<&str> {
    let start = if centerline { STROKE_OFFSET } else { FILL_OFFSET };
    let text = style.get(start..start + HEX_LEN)?;
    text.bytes().all(|b| b.is_ascii_hexdigit()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("FF80"), None);
        assert_eq!(Rgb::from_hex("GG8000"), None);
    }

    #[test]
    fn test_to_hex_uppercase_padded() {
        assert_eq!(Rgb::new(10, 0, 255).to_hex(), "0A00FF");
        assert_eq!(Rgb::new(10, 0, 255).to_string(), "0A00FF");
    }

    #[test]
    fn test_serialize_as_hex() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"010203\"");
    }

    #[test]
    fn test_extract_fill() {
        assert_eq!(
            extract_color("fill:#A1B2C3; stroke:none;", false),
            Some("A1B2C3")
        );
    }

    #[test]
    fn test_extract_stroke() {
        assert_eq!(
            extract_color("stroke:#00ff00; fill:none;", true),
            Some("00ff00")
        );
    }

    #[test]
    fn test_extract_rejects_bad_style() {
        assert_eq!(extract_color("fill:#A1", false), None);
        assert_eq!(extract_color("fill:none; stroke:#A1B2C3;", false), None);
        assert_eq!(extract_color("", true), None);
        // multi-byte text at the offset must not panic
        assert_eq!(extract_color("fill:#ééé", false), None);
    }
}
