//! Frame number <-> time string conversion.
//!
//! Three textual forms are supported:
//! - SMPTE drop-frame `HH:MM:SS;FF`
//! - SMPTE non-drop-frame `HH:MM:SS:FF`
//! - wall clock `HH:MM:SS.mmm`
//!
//! All functions are pure and take the frame rate explicitly. Drop-frame
//! counting only applies to non-integer rates whose nominal rate is a multiple
//! of 30 (29.97, 59.94, ...), and those rates count non-drop-frame labels at
//! the nominal integer rate. Other non-integer rates (23.976, ...) start each
//! labelled second at `round(seconds * fps)`, so `FF` counts from the frame
//! nearest to the real second boundary.

use crate::error::{PropertyError, Result};
use crate::locale::Locale;
use crate::number::{parse_double, scan_integer};
use serde::{Deserialize, Serialize};

/// Output format for [`format_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// Plain frame count.
    Frames,
    /// `HH:MM:SS.mmm`
    Clock,
    /// `HH:MM:SS;FF`
    #[default]
    SmpteDf,
    /// `HH:MM:SS:FF`
    SmpteNdf,
}

/// Integer frame rate used for drop-frame labels.
fn nominal_rate(fps: f64) -> i64 {
    (fps.round() as i64).max(1)
}

/// Frame labels skipped at each minute boundary, or `None` when `fps` does
/// not use drop-frame counting.
pub fn drop_frame_count(fps: f64) -> Option<i64> {
    let nominal = nominal_rate(fps);
    let fractional = (fps - fps.round()).abs() > 1e-6;
    (fractional && nominal % 30 == 0).then_some(nominal / 15)
}

/// First frame of the labelled second `seconds` in non-drop-frame counting.
fn second_start(seconds: i64, fps: f64) -> Option<i64> {
    if fps.fract() == 0.0 || drop_frame_count(fps).is_some() {
        return seconds.checked_mul(nominal_rate(fps));
    }
    let start = (seconds as f64 * fps).round();
    (start.abs() < i64::MAX as f64).then_some(start as i64)
}

fn invalid(text: &str) -> PropertyError {
    PropertyError::InvalidTimecode {
        input: text.to_string(),
    }
}

fn split_sign(frame: i64) -> (&'static str, i64) {
    if frame < 0 {
        ("-", frame.saturating_neg())
    } else {
        ("", frame)
    }
}

fn format_fields(sign: &str, total_seconds: i64, ff: i64, separator: char) -> String {
    let ss = total_seconds % 60;
    let mm = total_seconds / 60 % 60;
    let hh = total_seconds / 3600;
    format!("{sign}{hh:02}:{mm:02}:{ss:02}{separator}{ff:02}")
}

/// Format a frame as drop-frame timecode. Rates without drop-frame counting
/// produce non-drop-frame text.
pub fn frame_to_smpte_df(frame: i64, fps: f64) -> String {
    let Some(drop) = drop_frame_count(fps) else {
        return frame_to_smpte_ndf(frame, fps);
    };
    let nominal = nominal_rate(fps);
    let per_ten_minutes = nominal * 600 - drop * 9;
    let per_minute = nominal * 60 - drop;
    let (sign, frame) = split_sign(frame);
    let tens = frame / per_ten_minutes;
    let rem = frame % per_ten_minutes;
    let mut labels = frame.saturating_add(drop * 9 * tens);
    if rem > drop {
        labels = labels.saturating_add(drop * ((rem - drop) / per_minute));
    }
    format_fields(sign, labels / nominal, labels % nominal, ';')
}

/// Format a frame as non-drop-frame timecode.
pub fn frame_to_smpte_ndf(frame: i64, fps: f64) -> String {
    let (sign, frame) = split_sign(frame);
    let rate = if fps > 0.0 { fps } else { 1.0 };
    let starts_by = |seconds: i64| second_start(seconds, fps).is_some_and(|start| start <= frame);
    let mut seconds = (frame as f64 / rate).floor() as i64;
    while seconds > 0 && !starts_by(seconds) {
        seconds -= 1;
    }
    while seconds.checked_add(1).is_some_and(starts_by) {
        seconds += 1;
    }
    let ff = frame - second_start(seconds, fps).unwrap_or(0);
    format_fields(sign, seconds, ff, ':')
}

/// Format a frame as elapsed wall-clock time with millisecond precision.
pub fn frame_to_clock(frame: i64, fps: f64) -> String {
    if fps <= 0.0 {
        return "00:00:00.000".to_string();
    }
    let (sign, frame) = split_sign(frame);
    let total_ms = (frame as f64 * 1000.0 / fps).round() as i64;
    let ms = total_ms % 1000;
    let total_seconds = total_ms / 1000;
    let ss = total_seconds % 60;
    let mm = total_seconds / 60 % 60;
    let hh = total_seconds / 3600;
    format!("{sign}{hh:02}:{mm:02}:{ss:02}.{ms:03}")
}

/// Fields of a timecode, most significant first, with a missing leading
/// part treated as zero.
struct Fields {
    negative: bool,
    hours: i64,
    minutes: i64,
    seconds: i64,
    frames: i64,
}

fn int_field(text: &str, whole: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    match scan_integer(trimmed) {
        Some(s) if s.len == trimmed.len() => Ok(s.value),
        _ => Err(invalid(whole)),
    }
}

fn strip_sign(text: &str) -> (bool, &str) {
    let trimmed = text.trim();
    match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    }
}

fn smpte_fields(text: &str) -> Result<Fields> {
    let (negative, body) = strip_sign(text);
    let (head, frames) = match body.rfind([';', ':']) {
        Some(i) => (&body[..i], &body[i + 1..]),
        None => ("", body),
    };
    let mut parts = head.rsplit(':');
    let seconds = parts.next().unwrap_or_default();
    let minutes = parts.next().unwrap_or_default();
    let hours = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(invalid(text));
    }
    Ok(Fields {
        negative,
        hours: int_field(hours, text)?,
        minutes: int_field(minutes, text)?,
        seconds: int_field(seconds, text)?,
        frames: int_field(frames, text)?,
    })
}

/// `hours:minutes:seconds` as elapsed seconds, or `None` on overflow.
fn total_seconds(hours: i64, minutes: i64, seconds: i64) -> Option<i64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

fn apply_sign(negative: bool, frame: i64) -> i64 {
    if negative {
        frame.saturating_neg()
    } else {
        frame
    }
}

/// Parse drop-frame timecode. Rates without drop-frame counting parse as
/// non-drop-frame.
pub fn smpte_df_to_frame(text: &str, fps: f64) -> Result<i64> {
    let Some(drop) = drop_frame_count(fps) else {
        return smpte_ndf_to_frame(text, fps);
    };
    let f = smpte_fields(text)?;
    let frame = drop_frame_labels(&f, nominal_rate(fps), drop).ok_or_else(|| invalid(text))?;
    Ok(apply_sign(f.negative, frame))
}

fn drop_frame_labels(f: &Fields, nominal: i64, drop: i64) -> Option<i64> {
    let total_minutes = f.hours.checked_mul(60)?.checked_add(f.minutes)?;
    let skipped = drop.checked_mul(total_minutes - total_minutes / 10)?;
    total_seconds(f.hours, f.minutes, f.seconds)?
        .checked_mul(nominal)?
        .checked_add(f.frames)?
        .checked_sub(skipped)
}

/// Parse non-drop-frame timecode.
pub fn smpte_ndf_to_frame(text: &str, fps: f64) -> Result<i64> {
    let f = smpte_fields(text)?;
    let frame = total_seconds(f.hours, f.minutes, f.seconds)
        .and_then(|seconds| second_start(seconds, fps))
        .and_then(|start| start.checked_add(f.frames))
        .ok_or_else(|| invalid(text))?;
    Ok(apply_sign(f.negative, frame))
}

/// Parse wall-clock time, rounding to the nearest frame. Both `.` and `,`
/// (as well as the locale's decimal point) separate milliseconds.
pub fn clock_to_frame(text: &str, fps: f64, locale: Locale) -> Result<i64> {
    let (negative, body) = strip_sign(text);
    let mut parts = body.rsplit(':');
    let seconds_text = parts.next().unwrap_or_default().trim();
    let minutes = int_field(parts.next().unwrap_or_default(), text)?;
    let hours = int_field(parts.next().unwrap_or_default(), text)?;
    if parts.next().is_some() {
        return Err(invalid(text));
    }
    let seconds = if seconds_text.is_empty() {
        0.0
    } else {
        let normalized: String = seconds_text
            .chars()
            .map(|c| {
                if c == ',' || c == locale.decimal_point() {
                    '.'
                } else {
                    c
                }
            })
            .collect();
        parse_double(&normalized, Locale::C).ok_or_else(|| invalid(text))?
    };
    let whole = total_seconds(hours, minutes, 0).ok_or_else(|| invalid(text))?;
    let frame = ((whole as f64 + seconds) * fps).round();
    if !frame.is_finite() || frame.abs() >= i64::MAX as f64 {
        return Err(invalid(text));
    }
    Ok(apply_sign(negative, frame as i64))
}

/// Format a frame in the requested form.
pub fn format_time(frame: i64, fps: f64, format: TimeFormat) -> String {
    match format {
        TimeFormat::Frames => frame.to_string(),
        TimeFormat::Clock => frame_to_clock(frame, fps),
        TimeFormat::SmpteDf => frame_to_smpte_df(frame, fps),
        TimeFormat::SmpteNdf => frame_to_smpte_ndf(frame, fps),
    }
}

/// Text that should be read as a time value rather than a plain number.
pub fn looks_like_time(text: &str) -> bool {
    text.contains(':')
}

/// Parse any supported time spelling into a frame number.
///
/// A decimal separator selects clock parsing; otherwise `;` selects
/// drop-frame and `:` non-drop-frame. Text without a colon is a frame count.
pub fn parse_time(text: &str, fps: f64, locale: Locale) -> Result<i64> {
    if fps <= 0.0 {
        return Err(invalid(text));
    }
    if !looks_like_time(text) {
        return scan_integer(text)
            .map(|s| s.value)
            .ok_or_else(|| invalid(text));
    }
    if text.contains(['.', ',']) || text.contains(locale.decimal_point()) {
        clock_to_frame(text, fps, locale)
    } else if text.contains(';') {
        smpte_df_to_frame(text, fps)
    } else {
        smpte_ndf_to_frame(text, fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NTSC: f64 = 30000.0 / 1001.0;

    #[test]
    fn drop_frame_rates() {
        assert_eq!(drop_frame_count(29.97), Some(2));
        assert_eq!(drop_frame_count(NTSC), Some(2));
        assert_eq!(drop_frame_count(59.94), Some(4));
        assert_eq!(drop_frame_count(25.0), None);
        assert_eq!(drop_frame_count(30.0), None);
        assert_eq!(drop_frame_count(23.976), None);
    }

    #[test]
    fn non_drop_frame_values() {
        assert_eq!(frame_to_smpte_ndf(1023829, 25.0), "11:22:33:04");
        assert_eq!(smpte_ndf_to_frame("11:22:33:04", 25.0).unwrap(), 1023829);
        assert_eq!(frame_to_smpte_ndf(1228594, NTSC), "11:22:33:04");
        assert_eq!(smpte_ndf_to_frame("11:22:33:04", NTSC).unwrap(), 1228594);
    }

    #[test]
    fn fractional_rates_label_from_real_seconds() {
        let film = 24000.0 / 1001.0;
        assert_eq!(parse_time("11:22:33:04", film, Locale::C).unwrap(), 981894);
        assert_eq!(frame_to_smpte_df(981894, film), "11:22:33:04");
        assert_eq!(frame_to_smpte_ndf(981894, film), "11:22:33:04");
        // 24000/1001 * 1 rounds to 24, so the first second has 24 labels.
        assert_eq!(frame_to_smpte_ndf(23, film), "00:00:00:23");
        assert_eq!(frame_to_smpte_ndf(24, film), "00:00:01:00");
    }

    #[test]
    fn oversized_fields_are_rejected() {
        for text in [
            "99999999999999999999:00:00:00",
            "99999999999999999999:00:00;00",
            "00:99999999999999999999:00:00",
        ] {
            for fps in [25.0, NTSC, 24000.0 / 1001.0] {
                assert!(parse_time(text, fps, Locale::C).is_err(), "{text} @ {fps}");
            }
        }
        assert!(parse_time("99999999999999999999:00:00.5", 25.0, Locale::C).is_err());
        assert!(clock_to_frame("1e300", 25.0, Locale::C).is_err());
    }

    #[test]
    fn drop_frame_values() {
        assert_eq!(frame_to_smpte_df(519, 29.97), "00:00:17;09");
        assert_eq!(smpte_df_to_frame("00:00:17;09", 29.97).unwrap(), 519);
        assert_eq!(frame_to_smpte_df(1800, 29.97), "00:01:00;02");
        assert_eq!(frame_to_smpte_df(1799, 29.97), "00:00:59;29");
        assert_eq!(frame_to_smpte_df(17982, 29.97), "00:10:00;00");
        assert_eq!(smpte_df_to_frame("00:01:00;04", 59.94).unwrap(), 3600);
        assert_eq!(smpte_df_to_frame("00:10:00;01", 59.94).unwrap(), 36001 - 36);
        assert_eq!(frame_to_smpte_df(3600, 59.94), "00:01:00;04");
    }

    #[test]
    fn drop_frame_falls_back_for_integer_rates() {
        assert_eq!(frame_to_smpte_df(1023829, 25.0), "11:22:33:04");
        assert_eq!(smpte_df_to_frame("11:22:33;04", 25.0).unwrap(), 1023829);
    }

    #[test]
    fn clock_values() {
        assert_eq!(clock_to_frame("11:22:33.400", 25.0, Locale::C).unwrap(), 1023835);
        assert_eq!(frame_to_clock(1023835, 25.0), "11:22:33.400");
        assert_eq!(frame_to_clock(1, 30.0), "00:00:00.033");
        let de = Locale::with_decimal_point(',');
        assert_eq!(clock_to_frame("00:00:01,5", 25.0, de).unwrap(), 38);
    }

    #[test]
    fn shortened_and_negative_forms() {
        assert_eq!(parse_time(":2.0", 25.0, Locale::C).unwrap(), 50);
        assert_eq!(parse_time("1:", 25.0, Locale::C).unwrap(), 25);
        assert_eq!(parse_time("-1:", 25.0, Locale::C).unwrap(), -25);
        assert_eq!(frame_to_smpte_ndf(-26, 25.0), "-00:00:01:01");
        assert_eq!(parse_time("-00:00:01:01", 25.0, Locale::C).unwrap(), -26);
        assert_eq!(parse_time("120", 25.0, Locale::C).unwrap(), 120);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_time("aa:bb:cc:dd", 25.0, Locale::C).is_err());
        assert!(parse_time("1:2:3:4:5", 25.0, Locale::C).is_err());
        assert!(parse_time("00:00:01:00", 0.0, Locale::C).is_err());
    }

    #[test]
    fn formats_by_kind() {
        assert_eq!(format_time(50, 25.0, TimeFormat::Frames), "50");
        assert_eq!(format_time(50, 25.0, TimeFormat::Clock), "00:00:02.000");
        assert_eq!(format_time(50, 25.0, TimeFormat::SmpteNdf), "00:00:02:00");
        assert_eq!(format_time(50, 25.0, TimeFormat::SmpteDf), "00:00:02:00");
    }
}
