//! Numeric locale handle.
//!
//! Only the decimal separator matters for parsing and formatting numbers. The
//! handle is passed explicitly to every conversion; process-wide locale state
//! is never consulted.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Language prefixes whose numeric convention uses a decimal comma.
const COMMA_LANGUAGES: &[&str] = &[
    "bg", "ca", "cs", "da", "de", "el", "es", "et", "eu", "fi", "fr", "gl", "hr", "hu", "id",
    "is", "it", "lt", "lv", "nb", "nl", "nn", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sr",
    "sv", "tr", "uk", "vi",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    decimal_point: char,
}

impl Locale {
    /// The C/POSIX locale: `.` as decimal point.
    pub const C: Locale = Locale { decimal_point: '.' };

    pub const fn with_decimal_point(decimal_point: char) -> Self {
        Self { decimal_point }
    }

    /// Resolve a locale name such as `de_DE.UTF-8`, `fr`, `C` or `POSIX`.
    ///
    /// Unknown names fall back to the C locale.
    pub fn from_name(name: &str) -> Self {
        let language = name
            .split(['_', '.', '@', '-'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if COMMA_LANGUAGES.contains(&language.as_str()) {
            Locale::with_decimal_point(',')
        } else {
            Locale::C
        }
    }

    pub fn decimal_point(&self) -> char {
        self.decimal_point
    }

    /// Name used when the locale is serialized.
    pub fn name(&self) -> &'static str {
        if self.decimal_point == ',' {
            "de_DE"
        } else {
            "C"
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::C
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Locale {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LocaleVisitor;

        impl<'de> de::Visitor<'de> for LocaleVisitor {
            type Value = Locale;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a locale name")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Locale::from_name(v))
            }
        }

        deserializer.deserialize_str(LocaleVisitor)
    }
}
