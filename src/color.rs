//! LED colors and conversions between the color types the crate touches.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// Predefined RGB color constants from the `smart_leds` crate.
#[doc(inline)]
pub use smart_leds::colors;

/// RGB color type used by logical matrices and text.
pub use smart_leds::RGB8;

/// Single-hue amber LEDs.
pub const AMBER: RGB8 = RGB8::new(255, 176, 0);
/// Single-hue red LEDs.
pub const RED: RGB8 = RGB8::new(255, 0, 0);
/// Single-hue green LEDs.
pub const GREEN: RGB8 = RGB8::new(0, 255, 0);
/// All channels off.
pub const BLACK: RGB8 = RGB8::new(0, 0, 0);
/// All channels full.
pub const WHITE: RGB8 = RGB8::new(255, 255, 255);

/// Convert [`RGB8`] (smart-leds) to [`Rgb888`] (embedded-graphics).
#[must_use]
pub const fn rgb8_to_rgb888(color: RGB8) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

/// Convert [`Rgb888`] (embedded-graphics) to [`RGB8`] (smart-leds).
#[must_use]
pub fn rgb888_to_rgb8(color: Rgb888) -> RGB8 {
    RGB8::new(color.r(), color.g(), color.b())
}

/// Scale every channel by `brightness / 100`, truncating.
///
/// `brightness` above 100 is treated as 100.
#[must_use]
pub fn scale_brightness(color: RGB8, brightness: u8) -> RGB8 {
    let brightness = u16::from(brightness.min(100));
    let scale = |channel: u8| (u16::from(channel) * brightness / 100) as u8;
    RGB8::new(scale(color.r), scale(color.g), scale(color.b))
}

/// Rec. 601 luma scaled by 1000: `299R + 587G + 114B`, `0..=255_000`.
///
/// Kept in integers so white is exactly `255_000`.
#[must_use]
pub fn luma_milli(red: u8, green: u8, blue: u8) -> u32 {
    299 * u32::from(red) + 587 * u32::from(green) + 114 * u32::from(blue)
}

/// Format as `#RRGGBB`.
#[must_use]
pub fn to_hex(color: RGB8) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

/// Parse `#RRGGBB` or `RRGGBB` (case-insensitive).
#[must_use]
pub fn parse_hex(text: &str) -> Option<RGB8> {
    let digits = text.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: core::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    Some(RGB8::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Serde adapter storing [`RGB8`] as a `#RRGGBB` string.
///
/// Use with `#[serde(with = "crate::color::hex")]`.
pub mod hex {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::{RGB8, parse_hex, to_hex};

    /// Serialize as `#RRGGBB`.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(color: &RGB8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(*color))
    }

    /// Deserialize from `#RRGGBB`.
    ///
    /// # Errors
    ///
    /// Fails when the string is not a six-digit hex color.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RGB8, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_hex(&text).ok_or_else(|| D::Error::custom(format!("invalid color {text:?}")))
    }
}
