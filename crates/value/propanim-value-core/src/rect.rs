//! Geometry rectangle with optional trailing fields.

use crate::error::{PropertyError, Result};
use crate::locale::Locale;
use crate::number::{format_double, scan_double};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// `x y w h o`: position, size and opacity.
///
/// Fields that were never given hold [`Rect::UNSET`]. Callers must treat the
/// sentinel as "inherit the default" rather than as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub o: f64,
}

impl Rect {
    /// Marker for a field that was not specified.
    pub const UNSET: f64 = f64::MIN_POSITIVE;

    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
        o: 0.0,
    };

    /// Every field unset.
    pub const EMPTY: Rect = Rect {
        x: Rect::UNSET,
        y: Rect::UNSET,
        w: Rect::UNSET,
        h: Rect::UNSET,
        o: Rect::UNSET,
    };

    pub const fn new(x: f64, y: f64, w: f64, h: f64, o: f64) -> Self {
        Self { x, y, w, h, o }
    }

    /// A rect with only the position set.
    pub const fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Rect::EMPTY
        }
    }

    pub fn is_unset(field: f64) -> bool {
        field == Rect::UNSET
    }

    pub fn fields(&self) -> [f64; 5] {
        [self.x, self.y, self.w, self.h, self.o]
    }

    pub fn from_fields(f: [f64; 5]) -> Self {
        Self::new(f[0], f[1], f[2], f[3], f[4])
    }

    /// Opacity, with an unset field resolved to fully opaque.
    pub fn opacity(&self) -> f64 {
        if Rect::is_unset(self.o) {
            1.0
        } else {
            self.o
        }
    }

    /// Parse `"x y [w h [o]]"` or `"x/y:wxh:o"`.
    ///
    /// Numbers are taken left to right and anything between them separates
    /// fields. A `%` directly after a number divides it by 100.
    pub fn parse(text: &str, locale: Locale) -> Result<Self> {
        let mut fields = [Rect::UNSET; 5];
        let mut count = 0;
        let mut rest = text;
        while !rest.is_empty() && count < fields.len() {
            match scan_double(rest, locale) {
                Some(scanned) => {
                    let mut value = scanned.value;
                    rest = &rest[scanned.len..];
                    if let Some(after) = rest.strip_prefix('%') {
                        value /= 100.0;
                        rest = after;
                    }
                    fields[count] = value;
                    count += 1;
                }
                None => {
                    let skip = rest.chars().next().map_or(1, char::len_utf8);
                    rest = &rest[skip..];
                }
            }
        }
        if count == 0 {
            return Err(PropertyError::InvalidRect {
                input: text.to_string(),
            });
        }
        Ok(Rect::from_fields(fields))
    }

    /// Canonical text with unset trailing fields omitted.
    pub fn format(&self, locale: Locale) -> String {
        let fields = self.fields();
        let used = fields
            .iter()
            .rposition(|f| !Rect::is_unset(*f))
            .map_or(0, |i| i + 1);
        fields[..used]
            .iter()
            .map(|f| {
                if Rect::is_unset(*f) {
                    "0".to_string()
                } else {
                    format_double(*f, locale)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::ZERO
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(Locale::C))
    }
}

impl Serialize for Rect {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rect {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Rect::parse(&s, Locale::C).map_err(de::Error::custom)
    }
}
