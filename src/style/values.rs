//! Color and thickness normalization.
//!
//! Raw values arrive as loosely-typed JSON from UI inputs, saved templates,
//! and node snapshots. These functions coerce what they can and reject the
//! rest without failing.

use std::borrow::Cow;
use std::fmt;
use std::ops::RangeInclusive;

use serde_json::Value;

/// Largest stroke thickness any slot accepts.
pub const THICKNESS_MAX: u32 = 20;

/// Inclusive thickness bounds used by every normalizer.
pub const THICKNESS_BOUNDS: RangeInclusive<u32> = 0..=THICKNESS_MAX;

/// An RGB color in canonical `#RRGGBB` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const WHITE: HexColor = HexColor([0xFF, 0xFF, 0xFF]);
    pub const BLACK: HexColor = HexColor([0x00, 0x00, 0x00]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        HexColor([r, g, b])
    }

    /// Parse `#RRGGBB`, case-insensitive. Short forms, `rgb()`, and named
    /// colors are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(HexColor([r, g, b]))
    }

    #[inline]
    pub fn components(&self) -> (u8, u8, u8) {
        (self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.components();
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl serde::Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HexColor::parse(s.trim())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s}")))
    }
}

/// Normalize a raw color value.
///
/// Strings and numbers are coerced to text; the result is accepted only in
/// `#RRGGBB` form and returned uppercase.
pub fn normalize_color(raw: &Value) -> Option<HexColor> {
    let text = match raw {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        _ => return None,
    };
    HexColor::parse(text.trim())
}

/// Coerce a raw JSON value to a number. Numeric strings are accepted.
pub(crate) fn coerce_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Round a measured weight and clamp it into `bounds`.
///
/// Non-finite and negative weights are rejected.
pub fn clamp_thickness(value: f64, bounds: RangeInclusive<u32>) -> Option<u32> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let rounded = value.round().min(f64::from(*bounds.end()));
    Some((rounded as u32).max(*bounds.start()))
}

/// Normalize a raw thickness value into `bounds`.
///
/// Returns `None` when the value is missing or fails validation; callers at
/// apply time let the resolver fall back to a lower-precedence source.
pub fn normalize_thickness(raw: &Value, bounds: RangeInclusive<u32>) -> Option<u32> {
    clamp_thickness(coerce_number(raw)?, bounds)
}

/// Draft-editing variant of [`normalize_thickness`]: substitutes `fallback`
/// (clamped into `bounds`) when the raw value fails validation.
pub fn normalize_thickness_or(raw: &Value, fallback: u32, bounds: RangeInclusive<u32>) -> u32 {
    let fallback = fallback.clamp(*bounds.start(), *bounds.end());
    normalize_thickness(raw, bounds).unwrap_or(fallback)
}
