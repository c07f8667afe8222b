//! RGBA color with the textual forms used in property strings.
//!
//! Accepted spellings:
//! - named constants (`red`, `green`, `blue`, `black`, `white`, `transparent`)
//! - `#RRGGBB` (alpha forced to 0xff) and `#AARRGGBB`
//! - `0xRRGGBBAA`
//! - any integer, read as packed `RRGGBBAA`
//!
//! The canonical output is always `#aarrggbb`.

use crate::error::{PropertyError, Result};
use crate::number::{scan_hex_u32, scan_integer};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

const NAMED: &[(&str, u32)] = &[
    ("red", 0xff00_00ff),
    ("green", 0x00ff_00ff),
    ("blue", 0x0000_ffff),
    ("black", 0x0000_00ff),
    ("white", 0xffff_ffff),
    ("transparent", 0x0000_0000),
];

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack an `0xRRGGBBAA` integer.
    pub const fn from_rgba_u32(packed: u32) -> Self {
        Self {
            r: (packed >> 24) as u8,
            g: (packed >> 16) as u8,
            b: (packed >> 8) as u8,
            a: packed as u8,
        }
    }

    /// Pack into `0xRRGGBBAA`.
    pub const fn to_rgba_u32(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    pub fn named(name: &str) -> Option<Self> {
        NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, packed)| Color::from_rgba_u32(*packed))
    }

    /// Parse any accepted color spelling.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if let Some(color) = Color::named(trimmed) {
            return Ok(color);
        }
        parse_packed(trimmed).map(Color::from_rgba_u32)
    }
}

/// Resolve the packed `RRGGBBAA` integer of a color or integer spelling.
pub(crate) fn parse_packed(text: &str) -> Result<u32> {
    let invalid = || PropertyError::InvalidColor {
        input: text.to_string(),
    };
    if let Some(hex) = text.strip_prefix('#') {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let rgb = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        return match hex.len() {
            6 => Ok(rgb << 8 | 0xff),
            8 => Ok(rgb << 8 | rgb >> 24),
            _ => Err(invalid()),
        };
    }
    if let Some(packed) = scan_hex_u32(text) {
        return Ok(packed);
    }
    scan_integer(text)
        .map(|s| s.value as u32)
        .ok_or_else(invalid)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.a, self.r, self.g, self.b
        )
    }
}

impl FromStr for Color {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(de::Error::custom)
    }
}
