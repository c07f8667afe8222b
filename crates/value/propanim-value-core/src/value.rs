//! The polymorphic property value cell.
//!
//! A [`PropertyValue`] holds exactly one authoritative representation and
//! derives the others on demand. Derived views are cached behind `&self` and
//! every write clears them.

use crate::color::{self, Color};
use crate::error::{PropertyError, Result};
use crate::expression::{self, NoScope, Scope};
use crate::locale::Locale;
use crate::number::{format_double, scan_double, scan_hex_u32, scan_integer};
use crate::rect::Rect;
use crate::timecode::{self, TimeFormat};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::Cell;
use std::fmt;

/// Which representation is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    None,
    String,
    Int,
    Int64,
    Double,
    Color,
    Rect,
    Data,
}

type Destructor = Box<dyn FnOnce(Box<dyn Any + Send>) + Send>;
type Serializer = Box<dyn Fn(&(dyn Any + Send)) -> String + Send>;

/// An owned opaque value with an optional release hook and string form.
pub struct OpaqueData {
    value: Box<dyn Any + Send>,
    destructor: Option<Destructor>,
    serializer: Option<Serializer>,
}

impl OpaqueData {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Box::new(value),
            destructor: None,
            serializer: None,
        }
    }

    /// Run `release` with the value when it is overwritten or dropped.
    pub fn with_destructor<T, F>(mut self, release: F) -> Self
    where
        T: Any + Send,
        F: FnOnce(T) + Send + 'static,
    {
        self.destructor = Some(Box::new(move |boxed: Box<dyn Any + Send>| {
            if let Ok(value) = boxed.downcast::<T>() {
                release(*value);
            }
        }));
        self
    }

    /// Produce the string form of the value with `serialize`.
    pub fn with_serializer<T, F>(mut self, serialize: F) -> Self
    where
        T: Any + Send,
        F: Fn(&T) -> String + Send + 'static,
    {
        self.serializer = Some(Box::new(move |any: &(dyn Any + Send)| {
            any.downcast_ref::<T>().map(&serialize).unwrap_or_default()
        }));
        self
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn serialize(&self) -> Option<String> {
        self.serializer.as_ref().map(|s| s(&*self.value))
    }
}

impl Drop for OpaqueData {
    fn drop(&mut self) {
        if let Some(release) = self.destructor.take() {
            let value = std::mem::replace(&mut self.value, Box::new(()));
            release(value);
        }
    }
}

impl fmt::Debug for OpaqueData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueData")
            .field("destructor", &self.destructor.is_some())
            .field("serializer", &self.serializer.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
enum Repr {
    #[default]
    None,
    String(String),
    Int(i32),
    Int64(i64),
    Double(f64),
    Color(Color),
    Rect(Rect),
    Data(OpaqueData),
}

#[derive(Clone, Copy)]
struct CachedNumber {
    fps_bits: u64,
    decimal_point: char,
    value: f64,
}

#[derive(Default)]
pub struct PropertyValue {
    repr: Repr,
    text: OnceCell<String>,
    number: Cell<Option<CachedNumber>>,
    color: Cell<Option<Color>>,
    rect: Cell<Option<(char, Rect)>>,
}

fn recovered<T: Default>(result: Result<T>) -> T {
    result.unwrap_or_else(|err| {
        log::debug!("property conversion fell back to default: {err}");
        T::default()
    })
}

/// Resolve a numeric string to a double.
fn text_to_double(text: &str, fps: f64, locale: Locale, scope: &dyn Scope) -> Result<f64> {
    if expression::is_expression(text) {
        return expression::evaluate(text, locale, scope);
    }
    if let Some(hex) = scan_hex_u32(text) {
        return Ok(f64::from(hex));
    }
    if fps > 0.0 && timecode::looks_like_time(text) {
        return timecode::parse_time(text, fps, locale).map(|f| f as f64);
    }
    let scanned = scan_double(text, locale).ok_or_else(|| PropertyError::not_a_number(text))?;
    if text[scanned.len..].starts_with('%') {
        Ok(scanned.value / 100.0)
    } else {
        Ok(scanned.value)
    }
}

/// Resolve a numeric string to an integer, exact for integer literals.
fn text_to_int64(text: &str, fps: f64, locale: Locale, scope: &dyn Scope) -> Result<i64> {
    if expression::is_expression(text) {
        return expression::evaluate(text, locale, scope).map(|v| v as i64);
    }
    if text.starts_with('#') {
        return color::parse_packed(text).map(i64::from);
    }
    if let Some(hex) = scan_hex_u32(text) {
        return Ok(i64::from(hex));
    }
    if fps > 0.0 && timecode::looks_like_time(text) {
        return timecode::parse_time(text, fps, locale);
    }
    if let Some(scanned) = scan_integer(text) {
        let next = text[scanned.len..].chars().next();
        let fractional = next.is_some_and(|c| {
            c == locale.decimal_point() || c == 'e' || c == 'E' || c == '%'
        });
        if !fractional {
            return Ok(scanned.value);
        }
    }
    text_to_double(text, fps, locale, scope).map(|v| v as i64)
}

impl PropertyValue {
    pub fn new() -> Self {
        Self::default()
    }

    fn replace(&mut self, repr: Repr) {
        self.repr = repr;
        self.reset_caches();
    }

    /// Drop every derived view so the next read recomputes it.
    pub fn reset_caches(&mut self) {
        self.text = OnceCell::new();
        self.number.set(None);
        self.color.set(None);
        self.rect.set(None);
    }

    pub fn kind(&self) -> ValueKind {
        match &self.repr {
            Repr::None => ValueKind::None,
            Repr::String(_) => ValueKind::String,
            Repr::Int(_) => ValueKind::Int,
            Repr::Int64(_) => ValueKind::Int64,
            Repr::Double(_) => ValueKind::Double,
            Repr::Color(_) => ValueKind::Color,
            Repr::Rect(_) => ValueKind::Rect,
            Repr::Data(_) => ValueKind::Data,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::None)
    }

    pub fn clear(&mut self) {
        self.replace(Repr::None);
    }

    /// Store text verbatim; nothing is parsed until a typed read.
    pub fn set_string(&mut self, value: impl Into<String>) {
        self.replace(Repr::String(value.into()));
    }

    pub fn set_int(&mut self, value: i32) {
        self.replace(Repr::Int(value));
    }

    pub fn set_int64(&mut self, value: i64) {
        self.replace(Repr::Int64(value));
    }

    pub fn set_double(&mut self, value: f64) {
        self.replace(Repr::Double(value));
    }

    pub fn set_color(&mut self, value: Color) {
        self.replace(Repr::Color(value));
    }

    pub fn set_rect(&mut self, value: Rect) {
        self.replace(Repr::Rect(value));
    }

    pub fn set_data(&mut self, value: OpaqueData) {
        self.replace(Repr::Data(value));
    }

    /// Text form of the value, formatting typed values on first use.
    ///
    /// Returns `None` for an empty value and for data without a serializer.
    pub fn get_string(&self, locale: Locale) -> Option<&str> {
        let formatted = match &self.repr {
            Repr::None => return None,
            Repr::String(s) => return Some(s.as_str()),
            Repr::Data(data) if data.serializer.is_none() => return None,
            _ => self.text.get_or_try_init(|| self.format_typed(locale).ok_or(())),
        };
        formatted.ok().map(String::as_str)
    }

    fn format_typed(&self, locale: Locale) -> Option<String> {
        Some(match &self.repr {
            Repr::Int(v) => v.to_string(),
            Repr::Int64(v) => v.to_string(),
            Repr::Double(v) => format_double(*v, locale),
            Repr::Color(c) => c.to_string(),
            Repr::Rect(r) => r.format(locale),
            Repr::Data(data) => return data.serialize(),
            Repr::None | Repr::String(_) => return None,
        })
    }

    /// Borrow the authoritative string, if the value was set as text.
    pub fn raw(&self) -> Option<&str> {
        match &self.repr {
            Repr::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn try_double(&self, fps: f64, locale: Locale, scope: &dyn Scope) -> Result<f64> {
        match &self.repr {
            Repr::None => Err(PropertyError::Empty),
            Repr::Int(v) => Ok(f64::from(*v)),
            Repr::Int64(v) => Ok(*v as f64),
            Repr::Double(v) => Ok(*v),
            Repr::Color(c) => Ok(f64::from(c.to_rgba_u32())),
            Repr::Rect(r) => Ok(r.x),
            Repr::String(s) if expression::is_expression(s) => {
                text_to_double(s, fps, locale, scope)
            }
            Repr::String(s) => {
                let key = (fps.to_bits(), locale.decimal_point());
                if let Some(hit) = self
                    .number
                    .get()
                    .filter(|c| (c.fps_bits, c.decimal_point) == key)
                {
                    return Ok(hit.value);
                }
                let value = text_to_double(s, fps, locale, scope)?;
                self.number.set(Some(CachedNumber {
                    fps_bits: key.0,
                    decimal_point: key.1,
                    value,
                }));
                Ok(value)
            }
            Repr::Data(_) => match self.get_string(locale) {
                Some(text) => text_to_double(text, fps, locale, scope),
                None => Err(PropertyError::Empty),
            },
        }
    }

    pub fn try_int64(&self, fps: f64, locale: Locale, scope: &dyn Scope) -> Result<i64> {
        match &self.repr {
            Repr::None => Err(PropertyError::Empty),
            Repr::Int(v) => Ok(i64::from(*v)),
            Repr::Int64(v) => Ok(*v),
            Repr::Double(v) => Ok(*v as i64),
            Repr::Color(c) => Ok(i64::from(c.to_rgba_u32())),
            Repr::Rect(r) => Ok(r.x as i64),
            Repr::String(s) => text_to_int64(s, fps, locale, scope),
            Repr::Data(_) => match self.get_string(locale) {
                Some(text) => text_to_int64(text, fps, locale, scope),
                None => Err(PropertyError::Empty),
            },
        }
    }

    /// 32-bit integer view. Wider values wrap the way a C cast does, so
    /// packed `0xRRGGBBAA` colors keep their bit pattern.
    pub fn try_int(&self, fps: f64, locale: Locale, scope: &dyn Scope) -> Result<i32> {
        match &self.repr {
            Repr::Int(v) => Ok(*v),
            _ => self.try_int64(fps, locale, scope).map(|v| v as i32),
        }
    }

    pub fn get_double(&self, fps: f64, locale: Locale) -> f64 {
        recovered(self.try_double(fps, locale, &NoScope))
    }

    /// Like [`get_double`](Self::get_double), resolving `@` names in `scope`.
    pub fn get_double_in(&self, fps: f64, locale: Locale, scope: &dyn Scope) -> f64 {
        recovered(self.try_double(fps, locale, scope))
    }

    pub fn get_int(&self, fps: f64, locale: Locale) -> i32 {
        recovered(self.try_int(fps, locale, &NoScope))
    }

    pub fn get_int_in(&self, fps: f64, locale: Locale, scope: &dyn Scope) -> i32 {
        recovered(self.try_int(fps, locale, scope))
    }

    pub fn get_int64(&self, fps: f64, locale: Locale) -> i64 {
        recovered(self.try_int64(fps, locale, &NoScope))
    }

    pub fn get_int64_in(&self, fps: f64, locale: Locale, scope: &dyn Scope) -> i64 {
        recovered(self.try_int64(fps, locale, scope))
    }

    pub fn try_color(&self) -> Result<Color> {
        match &self.repr {
            Repr::None => Err(PropertyError::Empty),
            Repr::Color(c) => Ok(*c),
            Repr::Int(v) => Ok(Color::from_rgba_u32(*v as u32)),
            Repr::Int64(v) => Ok(Color::from_rgba_u32(*v as u32)),
            Repr::Double(v) => Ok(Color::from_rgba_u32(*v as i64 as u32)),
            Repr::Rect(r) => Err(PropertyError::InvalidColor {
                input: r.to_string(),
            }),
            Repr::String(s) => {
                if let Some(hit) = self.color.get() {
                    return Ok(hit);
                }
                let color = Color::parse(s)?;
                self.color.set(Some(color));
                Ok(color)
            }
            Repr::Data(_) => match self.get_string(Locale::C) {
                Some(text) => Color::parse(text),
                None => Err(PropertyError::Empty),
            },
        }
    }

    /// Color view; unparsable text yields transparent black.
    pub fn get_color(&self) -> Color {
        recovered(self.try_color())
    }

    pub fn try_rect(&self, locale: Locale) -> Result<Rect> {
        let at_x = |x: f64| Rect {
            x,
            ..Rect::EMPTY
        };
        match &self.repr {
            Repr::None => Err(PropertyError::Empty),
            Repr::Rect(r) => Ok(*r),
            Repr::Int(v) => Ok(at_x(f64::from(*v))),
            Repr::Int64(v) => Ok(at_x(*v as f64)),
            Repr::Double(v) => Ok(at_x(*v)),
            Repr::Color(c) => Err(PropertyError::InvalidRect {
                input: c.to_string(),
            }),
            Repr::String(s) => {
                let dp = locale.decimal_point();
                if let Some((_, hit)) = self.rect.get().filter(|(key, _)| *key == dp) {
                    return Ok(hit);
                }
                let rect = Rect::parse(s, locale)?;
                self.rect.set(Some((dp, rect)));
                Ok(rect)
            }
            Repr::Data(_) => match self.get_string(locale) {
                Some(text) => Rect::parse(text, locale),
                None => Err(PropertyError::Empty),
            },
        }
    }

    /// Rect view; unparsable text yields the zero rect.
    pub fn get_rect(&self, locale: Locale) -> Rect {
        recovered(self.try_rect(locale))
    }

    pub fn get_data<T: Any>(&self) -> Option<&T> {
        match &self.repr {
            Repr::Data(data) => data.get::<T>(),
            _ => None,
        }
    }

    /// Format the frame value of this property as time text.
    pub fn get_time(&self, format: TimeFormat, fps: f64, locale: Locale) -> String {
        timecode::format_time(self.get_int64(fps, locale), fps, format)
    }
}

impl Clone for PropertyValue {
    /// Opaque data cannot be duplicated: a clone carries its serialized text,
    /// or nothing when there is no serializer.
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::None => Repr::None,
            Repr::String(s) => Repr::String(s.clone()),
            Repr::Int(v) => Repr::Int(*v),
            Repr::Int64(v) => Repr::Int64(*v),
            Repr::Double(v) => Repr::Double(*v),
            Repr::Color(c) => Repr::Color(*c),
            Repr::Rect(r) => Repr::Rect(*r),
            Repr::Data(data) => data.serialize().map_or(Repr::None, Repr::String),
        };
        Self {
            repr,
            ..Self::default()
        }
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyValue").field(&self.repr).finish()
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        let mut v = Self::new();
        v.set_string(value);
        v
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        let mut v = Self::new();
        v.set_string(value);
        v
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        let mut v = Self::new();
        v.set_int(value);
        v
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        let mut v = Self::new();
        v.set_int64(value);
        v
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        let mut v = Self::new();
        v.set_double(value);
        v
    }
}

impl From<Color> for PropertyValue {
    fn from(value: Color) -> Self {
        let mut v = Self::new();
        v.set_color(value);
        v
    }
}

impl From<Rect> for PropertyValue {
    fn from(value: Rect) -> Self {
        let mut v = Self::new();
        v.set_rect(value);
        v
    }
}

impl From<OpaqueData> for PropertyValue {
    fn from(value: OpaqueData) -> Self {
        let mut v = Self::new();
        v.set_data(value);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const C: Locale = Locale::C;

    #[test]
    fn text_is_stored_verbatim() {
        let v = PropertyValue::from("-1");
        assert_eq!(v.get_int(0.0, C), -1);
        assert_eq!(v.get_string(C), Some("-1"));
        assert_eq!(v.kind(), ValueKind::String);
    }

    #[test]
    fn hex_text_keeps_bit_pattern() {
        let v = PropertyValue::from("0xaabbccdd");
        assert_eq!(v.get_int(0.0, C), 0xaabb_ccdd_u32 as i32);
        assert_eq!(v.get_int64(0.0, C), 0xaabb_ccdd);
        assert_relative_eq!(v.get_double(0.0, C), 2_864_434_397.0);
    }

    #[test]
    fn percent_needs_to_touch_the_number() {
        assert_relative_eq!(PropertyValue::from("12.3%").get_double(0.0, C), 0.123);
        assert_relative_eq!(PropertyValue::from("456 %").get_double(0.0, C), 456.0);
        assert_eq!(PropertyValue::from("50%").get_int(0.0, C), 0);
    }

    #[test]
    fn trailing_text_is_ignored() {
        let v = PropertyValue::from("10=100; 20=200");
        assert_relative_eq!(v.get_double(25.0, C), 10.0);
        assert_eq!(v.get_int(25.0, C), 10);
        assert_eq!(PropertyValue::from("1.9").get_int(0.0, C), 1);
        assert_eq!(PropertyValue::from("-1.9").get_int(0.0, C), -1);
        assert_eq!(PropertyValue::from("1e3").get_int(0.0, C), 1000);
    }

    #[test]
    fn malformed_text_recovers_to_zero() {
        let v = PropertyValue::from("banana");
        assert_eq!(v.get_int(25.0, C), 0);
        assert_relative_eq!(v.get_double(25.0, C), 0.0);
        assert_eq!(v.get_color(), Color::default());
        assert_eq!(v.get_rect(C), Rect::ZERO);
        assert!(matches!(
            v.try_double(25.0, C, &NoScope),
            Err(PropertyError::NotANumber { .. })
        ));
        assert_eq!(PropertyValue::new().try_int(25.0, C, &NoScope), Err(PropertyError::Empty));
    }

    #[test]
    fn time_text_needs_a_frame_rate() {
        let v = PropertyValue::from("11:22:33:04");
        assert_eq!(v.get_int(25.0, C), 1023829);
        assert_eq!(v.get_int(0.0, C), 11);
        let clock = PropertyValue::from("11:22:33.400");
        assert_eq!(clock.get_int(25.0, C), 1023835);
        assert_eq!(clock.get_time(TimeFormat::Clock, 25.0, C), "11:22:33.400");
        let frames = PropertyValue::from(1023829);
        assert_eq!(frames.get_time(TimeFormat::SmpteNdf, 25.0, C), "11:22:33:04");
    }

    #[test]
    fn oversized_time_text_reads_as_zero() {
        let smpte = PropertyValue::from("99999999999999999999:00:00:00");
        assert_eq!(smpte.get_int64(25.0, C), 0);
        assert_relative_eq!(smpte.get_double(25.0, C), 0.0);
        let clock = PropertyValue::from("99999999999999999999:00:00.5");
        assert_eq!(clock.get_int64(25.0, C), 0);
        assert_eq!(clock.get_int(25.0, C), 0);
    }

    #[test]
    fn locale_controls_decimal_point() {
        let de = Locale::from_name("de_DE.UTF-8");
        let v = PropertyValue::from("0,125");
        assert_relative_eq!(v.get_double(0.0, de), 0.125);
        assert_relative_eq!(v.get_double(0.0, C), 0.0);
        let d = PropertyValue::from(0.5);
        assert_eq!(d.get_string(de), Some("0,5"));
    }

    #[test]
    fn typed_setters_format_canonically() {
        let mut v = PropertyValue::new();
        v.set_double(-1.23456);
        assert_eq!(v.get_string(C), Some("-1.23456"));
        v.set_double(100.0);
        assert_eq!(v.get_string(C), Some("100"));
        v.set_int64(1 << 40);
        assert_eq!(v.get_string(C), Some("1099511627776"));
        v.set_color(Color::new(0xaa, 0xbb, 0xcc, 0xdd));
        assert_eq!(v.get_string(C), Some("#ddaabbcc"));
        assert_eq!(v.get_int(0.0, C), 0xaabb_ccdd_u32 as i32);
        v.set_rect(Rect::new(1.0, 2.0, 3.0, 4.0, Rect::UNSET));
        assert_eq!(v.get_string(C), Some("1 2 3 4"));
    }

    #[test]
    fn writes_invalidate_caches() {
        let mut v = PropertyValue::from("1.5");
        assert_relative_eq!(v.get_double(0.0, C), 1.5);
        v.set_string("2.5");
        assert_relative_eq!(v.get_double(0.0, C), 2.5);
        v.set_int(7);
        assert_eq!(v.get_string(C), Some("7"));
        v.set_int(8);
        assert_eq!(v.get_string(C), Some("8"));
    }

    #[test]
    fn colors_from_text_and_ints() {
        assert_eq!(
            PropertyValue::from("#aabbcc").get_color(),
            Color::new(0xaa, 0xbb, 0xcc, 0xff)
        );
        assert_eq!(
            PropertyValue::from("#00aabbcc").get_color(),
            Color::new(0xaa, 0xbb, 0xcc, 0x00)
        );
        assert_eq!(PropertyValue::from("#aabbcc").get_int(0.0, C), 0xaabb_ccff_u32 as i32);
        assert_eq!(PropertyValue::from("#aabbcc").get_int64(0.0, C), 0xaabb_ccff);
        assert_eq!(
            PropertyValue::from(0x1122_3344).get_color(),
            Color::new(0x11, 0x22, 0x33, 0x44)
        );
    }

    #[test]
    fn color_text_is_not_a_double() {
        let v = PropertyValue::from("#ff0000");
        assert_relative_eq!(v.get_double(0.0, C), 0.0);
        assert!(v.try_double(0.0, C, &NoScope).is_err());
        assert_eq!(v.get_int(0.0, C), 0xff00_00ff_u32 as i32);
    }

    #[test]
    fn rects_from_numbers() {
        let r = PropertyValue::from(1_i64 << 33).get_rect(C);
        assert_relative_eq!(r.x, 8_589_934_592.0);
        assert!(Rect::is_unset(r.y));
        let r = PropertyValue::from("100% 200%").get_rect(C);
        assert_relative_eq!(r.x, 1.0);
        assert_relative_eq!(r.y, 2.0);
    }

    #[test]
    fn expressions_use_the_scope() {
        let v = PropertyValue::from("@16.0/9.0 *2 +3 -1");
        assert_eq!(v.get_int(0.0, C), 5);
        let scope = |name: &str| (name == "base").then_some(10.0);
        let v = PropertyValue::from("@base * 2");
        assert_relative_eq!(v.get_double_in(0.0, C, &scope), 20.0);
        assert_relative_eq!(v.get_double(0.0, C), 0.0);
        assert_eq!(v.get_string(C), Some("@base * 2"));
    }

    #[test]
    fn data_destructor_runs_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        let mut v = PropertyValue::new();
        v.set_data(
            OpaqueData::new(vec![1_u8, 2, 3]).with_destructor(move |bytes: Vec<u8>| {
                counter.fetch_add(bytes.len(), Ordering::SeqCst);
            }),
        );
        assert_eq!(v.get_data::<Vec<u8>>(), Some(&vec![1, 2, 3]));
        assert_eq!(v.get_data::<String>(), None);
        assert_eq!(v.get_string(C), None);
        v.set_int(1);
        assert_eq!(released.load(Ordering::SeqCst), 3);
        drop(v);
        assert_eq!(released.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn data_serializer_feeds_text() {
        let v = PropertyValue::from(
            OpaqueData::new(42_u32).with_serializer(|n: &u32| format!("n={n}")),
        );
        assert_eq!(v.get_string(C), Some("n=42"));
        let copy = v.clone();
        assert_eq!(copy.kind(), ValueKind::String);
        assert_eq!(copy.get_string(C), Some("n=42"));
    }
}
