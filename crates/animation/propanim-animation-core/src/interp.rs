//! Interpolation between keyframe values:
//! - hold (discrete)
//! - linear blend
//! - Catmull-Rom spline through the two outer neighbours (smooth)
//!
//! Numbers blend directly, colors per channel and rects per field.

use crate::keyframe::KeyframeType;
use propanim_value_core::number::scan_double;
use propanim_value_core::{Color, Locale, NoScope, PropertyValue, Rect, ValueKind};

/// How keyframe values are read when blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Blend {
    /// Infer from the keyframe values.
    #[default]
    Auto,
    Number,
    Color,
    Rect,
    /// Never blend; always the left keyframe's value.
    Hold,
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Uniform Catmull-Rom segment between `p[1]` and `p[2]`.
#[inline]
pub fn catmull_rom(p: [f64; 4], t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let a0 = -0.5 * p[0] + 1.5 * p[1] - 1.5 * p[2] + 0.5 * p[3];
    let a1 = p[0] - 2.5 * p[1] + 2.0 * p[2] - 0.5 * p[3];
    let a2 = -0.5 * p[0] + 0.5 * p[2];
    a0 * t3 + a1 * t2 + a2 * t + p[1]
}

/// Blend four scalar control points at `t` for a segment of `kind`.
#[inline]
pub fn blend_scalar(kind: KeyframeType, p: [f64; 4], t: f64) -> f64 {
    match kind {
        KeyframeType::Discrete => p[1],
        KeyframeType::Linear => lerp(p[1], p[2], t),
        KeyframeType::Smooth => catmull_rom(p, t),
    }
}

fn looks_like_color(value: &PropertyValue) -> bool {
    match value.kind() {
        ValueKind::Color => true,
        ValueKind::String => value.raw().is_some_and(|s| {
            let s = s.trim();
            s.starts_with('#') || Color::named(s).is_some()
        }),
        _ => false,
    }
}

fn looks_like_rect(value: &PropertyValue, locale: Locale) -> bool {
    match value.kind() {
        ValueKind::Rect => true,
        ValueKind::String => value.raw().is_some_and(|s| {
            let s = s.trim();
            s.contains([' ', '/']) && scan_double(s, locale).is_some()
        }),
        _ => false,
    }
}

fn is_numeric(value: &PropertyValue, fps: f64, locale: Locale) -> bool {
    value.try_double(fps, locale, &NoScope).is_ok()
}

/// Pick an interpretation both bounding values agree on.
pub fn classify(left: &PropertyValue, right: &PropertyValue, fps: f64, locale: Locale) -> Blend {
    if looks_like_color(left) && looks_like_color(right) {
        Blend::Color
    } else if looks_like_rect(left, locale) || looks_like_rect(right, locale) {
        Blend::Rect
    } else if is_numeric(left, fps, locale) && is_numeric(right, fps, locale) {
        Blend::Number
    } else {
        Blend::Hold
    }
}

fn blend_color(kind: KeyframeType, p: [Color; 4], t: f64) -> Color {
    let channel = |get: fn(&Color) -> u8| {
        let v = blend_scalar(kind, p.map(|c| f64::from(get(&c))), t);
        v.round().clamp(0.0, 255.0) as u8
    };
    Color {
        r: channel(|c| c.r),
        g: channel(|c| c.g),
        b: channel(|c| c.b),
        a: channel(|c| c.a),
    }
}

fn blend_rect(kind: KeyframeType, p: [Rect; 4], t: f64) -> Rect {
    let fields = p.map(|r| r.fields());
    let mut out = fields[1];
    for (i, slot) in out.iter_mut().enumerate() {
        let (a, b) = (fields[1][i], fields[2][i]);
        if Rect::is_unset(a) || Rect::is_unset(b) {
            continue;
        }
        let before = if Rect::is_unset(fields[0][i]) { a } else { fields[0][i] };
        let after = if Rect::is_unset(fields[3][i]) { b } else { fields[3][i] };
        *slot = blend_scalar(kind, [before, a, b, after], t);
    }
    Rect::from_fields(out)
}

/// Interpolate between `points[1]` and `points[2]`; `points[0]` and
/// `points[3]` are the outer neighbours used by smooth segments.
pub fn interpolate(
    points: [&PropertyValue; 4],
    progress: f64,
    kind: KeyframeType,
    blend: Blend,
    fps: f64,
    locale: Locale,
) -> PropertyValue {
    if kind == KeyframeType::Discrete {
        return points[1].clone();
    }
    let blend = match blend {
        Blend::Auto => classify(points[1], points[2], fps, locale),
        other => other,
    };
    match blend {
        Blend::Number => {
            let p = points.map(|v| v.get_double(fps, locale));
            PropertyValue::from(blend_scalar(kind, p, progress))
        }
        Blend::Color => {
            let p = points.map(|v| v.get_color());
            PropertyValue::from(blend_color(kind, p, progress))
        }
        Blend::Rect => {
            let p = points.map(|v| v.get_rect(locale));
            PropertyValue::from(blend_rect(kind, p, progress))
        }
        Blend::Auto | Blend::Hold => points[1].clone(),
    }
}
