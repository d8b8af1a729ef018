//! Thread color values and the RGB distance every matching decision uses.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// An opaque 8-bit sRGB color.
///
/// The text form is `#RRGGBB` (uppercase); this is what grid cells hold in the
/// interchange format and what the palette's hex strings decode to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse `RRGGBB` or `#RRGGBB` in either case.
    pub fn from_hex(s: &str) -> Result<Self, PatternError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        // palette's parser also takes the 3-digit shorthand, which cells never use.
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PatternError::InvalidColor(s.to_string()));
        }
        let rgb = Srgb::<u8>::from_str(hex).map_err(|_| PatternError::InvalidColor(s.to_string()))?;
        Ok(rgb.into())
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Squared Euclidean RGB distance. Orders candidates exactly like [`distance`].
    #[inline(always)]
    pub fn distance_sq(self, other: Color) -> u32 {
        let dr = self.red as i32 - other.red as i32;
        let dg = self.green as i32 - other.green as i32;
        let db = self.blue as i32 - other.blue as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Relative luminance in 0-255 space (Rec. 709 weights).
    pub fn luminance(self) -> f32 {
        0.2126 * self.red as f32 + 0.7152 * self.green as f32 + 0.0722 * self.blue as f32
    }

    /// Lighten (`percent > 0`) toward white or darken (`percent < 0`) toward black.
    ///
    /// `percent` is clamped to `[-1, 1]`.
    pub fn shade(self, percent: f32) -> Color {
        let percent = percent.clamp(-1.0, 1.0);
        let target = if percent < 0.0 { 0.0 } else { 255.0 };
        let p = percent.abs();
        let mix = |c: u8| {
            let c = c as f32;
            // half steps round up, toward white
            (((target - c) * p + 0.5).floor() + c).clamp(0.0, 255.0) as u8
        };
        Color::new(mix(self.red), mix(self.green), mix(self.blue))
    }

    /// A contrasting shade for drawing symbols or highlights on top of this color.
    pub fn overlay_shade(self) -> Color {
        let brightness = (self.red as f32 * 299.0
            + self.green as f32 * 587.0
            + self.blue as f32 * 114.0)
            / 255_000.0;
        self.shade(if brightness > 0.6 { -0.4 } else { 0.4 })
    }
}

/// Euclidean distance in RGB space, no weighting.
pub fn distance(a: Color, b: Color) -> f64 {
    (a.distance_sq(b) as f64).sqrt()
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Color::new(c.red, c.green, c.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(c: Color) -> Self {
        Srgb::new(c.red, c.green, c.blue)
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Color::new(red, green, blue)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = PatternError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}
