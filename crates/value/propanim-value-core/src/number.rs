//! Locale-aware numeral scanning and formatting.
//!
//! Scanners behave like the C `strtod`/`strtol` family: leading whitespace is
//! skipped, the longest valid numeral prefix is consumed and the remainder is
//! left to the caller.

use crate::locale::Locale;

/// A numeral found at the start of a string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scanned<T> {
    pub value: T,
    /// Bytes consumed, including skipped leading whitespace.
    pub len: usize,
}

fn decimal_byte(locale: Locale) -> u8 {
    let dp = locale.decimal_point();
    if dp.is_ascii() {
        dp as u8
    } else {
        b'.'
    }
}

fn skip_space(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn digits(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

/// Scan a floating point literal. Hexadecimal integers (`0x1F`) are accepted.
pub fn scan_double(text: &str, locale: Locale) -> Option<Scanned<f64>> {
    let bytes = text.as_bytes();
    let dp = decimal_byte(locale);
    let start = skip_space(bytes, 0);
    let mut i = start;
    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    if let Some(hex) = scan_hex(bytes, i) {
        let value = hex.value as f64;
        return Some(Scanned {
            value: if negative { -value } else { value },
            len: hex.len,
        });
    }

    let int_start = i;
    i = digits(bytes, i);
    let mut has_digits = i > int_start;
    let mut literal = String::with_capacity(i - start + 8);
    literal.push_str(&text[start..i]);

    if bytes.get(i) == Some(&dp) {
        let frac_start = i + 1;
        let frac_end = digits(bytes, frac_start);
        if frac_end > frac_start || has_digits {
            literal.push('.');
            literal.push_str(&text[frac_start..frac_end]);
            has_digits |= frac_end > frac_start;
            i = frac_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits(bytes, j);
        if exp_end > j {
            literal.push_str(&text[i..exp_end]);
            i = exp_end;
        }
    }

    literal.parse::<f64>().ok().map(|value| Scanned { value, len: i })
}

/// Scan `0x`-prefixed hexadecimal digits starting at `i`.
fn scan_hex(bytes: &[u8], i: usize) -> Option<Scanned<u64>> {
    if bytes.get(i) != Some(&b'0') || !matches!(bytes.get(i + 1), Some(b'x' | b'X')) {
        return None;
    }
    let mut j = i + 2;
    let mut value: u64 = 0;
    while let Some(d) = bytes.get(j).and_then(|b| (*b as char).to_digit(16)) {
        value = value.saturating_mul(16).saturating_add(u64::from(d));
        j += 1;
    }
    (j > i + 2).then_some(Scanned { value, len: j })
}

/// Scan `0x` hexadecimal digits at the start of `text` (after whitespace).
pub fn scan_hex_u32(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    let start = skip_space(bytes, 0);
    scan_hex(bytes, start).map(|s| s.value as u32)
}

/// Scan a decimal integer, saturating on overflow.
pub fn scan_integer(text: &str) -> Option<Scanned<i64>> {
    let bytes = text.as_bytes();
    let mut i = skip_space(bytes, 0);
    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let int_start = i;
    let mut value: i64 = 0;
    while let Some(b) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
        let d = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
        i += 1;
    }
    (i > int_start).then_some(Scanned { value, len: i })
}

/// Shortest decimal text that parses back to `value`, using the locale's
/// decimal point.
pub fn format_double(value: f64, locale: Locale) -> String {
    let text = value.to_string();
    let dp = locale.decimal_point();
    if dp == '.' {
        text
    } else {
        text.replace('.', dp.encode_utf8(&mut [0; 4]))
    }
}

/// Parse the leading numeral of `text`, ignoring any trailing characters.
pub fn parse_double(text: &str, locale: Locale) -> Option<f64> {
    scan_double(text, locale).map(|s| s.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scans_prefix_like_strtod() {
        let s = scan_double("  12.5abc", Locale::C).unwrap();
        assert_relative_eq!(s.value, 12.5);
        assert_eq!(s.len, 6);
        assert_relative_eq!(parse_double("-1.23456", Locale::C).unwrap(), -1.23456);
        assert_relative_eq!(parse_double(".5", Locale::C).unwrap(), 0.5);
        assert_relative_eq!(parse_double("5.", Locale::C).unwrap(), 5.0);
        assert_relative_eq!(parse_double("1e3x", Locale::C).unwrap(), 1000.0);
        assert_relative_eq!(parse_double("2e", Locale::C).unwrap(), 2.0);
        assert!(parse_double("abc", Locale::C).is_none());
        assert!(parse_double(".", Locale::C).is_none());
        assert!(parse_double("", Locale::C).is_none());
    }

    #[test]
    fn decimal_point_follows_locale() {
        let de = Locale::with_decimal_point(',');
        assert_relative_eq!(parse_double("0,125", de).unwrap(), 0.125);
        assert_relative_eq!(parse_double("0,125", Locale::C).unwrap(), 0.0);
        assert_relative_eq!(parse_double("0.125", de).unwrap(), 0.0);
        assert_eq!(format_double(0.125, de), "0,125");
    }

    #[test]
    fn scans_hex() {
        assert_relative_eq!(parse_double("0xff", Locale::C).unwrap(), 255.0);
        assert_eq!(scan_hex_u32("0xaabbccdd"), Some(0xaabb_ccdd));
        assert_eq!(scan_hex_u32("0x"), None);
        assert_eq!(scan_hex_u32("12"), None);
    }

    #[test]
    fn scans_integers() {
        assert_eq!(scan_integer("-1").unwrap().value, -1);
        assert_eq!(scan_integer(" 42 rest").unwrap().len, 3);
        assert_eq!(scan_integer("99999999999999999999").unwrap().value, i64::MAX);
        assert_eq!(scan_integer("-99999999999999999999").unwrap().value, i64::MIN);
        assert!(scan_integer("-").is_none());
    }

    #[test]
    fn formats_shortest() {
        assert_eq!(format_double(-1.23456, Locale::C), "-1.23456");
        assert_eq!(format_double(100.0, Locale::C), "100");
        assert_eq!(format_double(0.1, Locale::C), "0.1");
    }
}
