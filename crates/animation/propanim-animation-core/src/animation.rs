//! Keyframe animation of a single property.
//!
//! Grammar (one entry per keyframe, `;`-separated):
//!   POS ['|' | '!' | '~'] '=' VALUE
//! - `POS` is a frame number or a time string (`"1:"`, `":2.5"`,
//!   `"00:00:01:00"`); negative positions count back from the length.
//! - `|`/`!` mark a discrete keyframe, `~` a smooth one, nothing a linear one.
//! - `VALUE` may be wrapped in double quotes (`""` for an embedded quote),
//!   which lets it contain `;`.
//! - An entry without `=` is a value at frame 0.
//!
//! Example: `"0=0;50~=100;100|=0"`.

use crate::error::{AnimationError, Result};
use crate::interp::{self, Blend};
use crate::keyframe::{AnimationItem, Keyframe, KeyframeType};
use propanim_value_core::{Locale, NoScope, PropertyError, PropertyValue};
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Animation {
    keyframes: Vec<Keyframe>,
    length: i64,
    repeat: bool,
    mirror: bool,
    fps: f64,
    locale: Locale,
    source: Option<String>,
    revision: u64,
}

/// Split on `;` outside double quotes.
fn split_entries(text: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                entries.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&text[start..]);
    entries
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    match value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => value.to_string(),
    }
}

fn quote_if_needed(value: &str) -> String {
    let needs_quotes = value.contains([';', '"'])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl Animation {
    pub fn new(fps: f64, locale: Locale) -> Self {
        Self {
            fps,
            locale,
            ..Self::default()
        }
    }

    /// Parse keyframe text, recovering from malformed positions by placing
    /// the entry at frame 0.
    pub fn parse(text: &str, length: i64, fps: f64, locale: Locale) -> Self {
        let mut animation = Animation::new(fps, locale);
        animation.length = length;
        // Lenient parsing never fails.
        let _ = animation.load(text, false);
        animation
    }

    /// Parse keyframe text, rejecting entries whose position is not a number
    /// or time value.
    pub fn try_parse(text: &str, length: i64, fps: f64, locale: Locale) -> Result<Self> {
        let mut animation = Animation::new(fps, locale);
        animation.length = length;
        animation.load(text, true)?;
        Ok(animation)
    }

    fn load(&mut self, text: &str, strict: bool) -> Result<()> {
        self.keyframes.clear();
        self.source = Some(text.to_string());
        self.revision += 1;
        for entry in split_entries(text) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let key = self.parse_entry(entry, strict)?;
            self.put(key);
        }
        Ok(())
    }

    fn parse_entry(&self, entry: &str, strict: bool) -> Result<Keyframe> {
        let Some(eq) = entry.find('=') else {
            return Ok(Keyframe::new(0, unquote(entry), KeyframeType::Linear));
        };
        let mut position = &entry[..eq];
        let mut kind = KeyframeType::Linear;
        if let Some(marked) = position.chars().last().and_then(KeyframeType::from_marker) {
            kind = marked;
            position = &position[..position.len() - 1];
        }
        let frame = match PropertyValue::from(position.trim()).try_int64(
            self.fps,
            self.locale,
            &NoScope,
        ) {
            Ok(frame) => frame,
            Err(_) if strict => {
                return Err(PropertyError::MalformedAnimationGrammar {
                    entry: entry.to_string(),
                }
                .into())
            }
            Err(err) => {
                log::warn!("keyframe entry {entry:?} placed at frame 0: {err}");
                0
            }
        };
        let frame = if frame < 0 {
            frame + self.get_length()
        } else {
            frame
        };
        Ok(Keyframe::new(frame, unquote(&entry[eq + 1..]), kind))
    }

    /// Re-parse only when the text or length differ from the last parse.
    /// Returns whether anything was re-parsed.
    pub fn refresh(&mut self, text: &str, length: i64) -> bool {
        if length == self.length && self.source.as_deref() == Some(text) {
            return false;
        }
        self.length = length;
        // Lenient parsing never fails.
        let _ = self.load(text, false);
        true
    }

    pub(crate) fn mark_source(&mut self, text: &str) {
        self.source = Some(text.to_string());
    }

    /// Insert keeping frames sorted and unique; an equal frame is replaced.
    fn put(&mut self, key: Keyframe) {
        match self.keyframes.binary_search_by_key(&key.frame, |k| k.frame) {
            Ok(i) => self.keyframes[i] = key,
            Err(i) => self.keyframes.insert(i, key),
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Counter bumped by every structural edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// The length set for this animation (`<= 0` when unset).
    pub fn length(&self) -> i64 {
        self.length
    }

    /// The set length, or the last keyframe's frame when unset.
    pub fn get_length(&self) -> i64 {
        if self.length > 0 {
            self.length
        } else {
            self.keyframes.last().map_or(0, |k| k.frame.max(0))
        }
    }

    pub fn set_length(&mut self, length: i64) {
        self.length = length;
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    pub fn mirror(&self) -> bool {
        self.mirror
    }

    pub fn set_mirror(&mut self, mirror: bool) {
        self.mirror = mirror;
    }

    /// Map a position into the first cycle when repeating.
    fn wrap(&self, position: i64) -> i64 {
        if !self.repeat || self.length <= 0 || position < self.length {
            return position;
        }
        let cycle = position / self.length;
        let offset = position % self.length;
        if self.mirror && cycle % 2 == 1 {
            self.length - offset
        } else {
            offset
        }
    }

    /// Value at `position`, inferring how to blend from the keyframes.
    pub fn get_item(&self, position: i64) -> Option<AnimationItem> {
        self.get_item_as(position, Blend::Auto)
    }

    /// Value at `position`, blending keyframe values as `blend`.
    pub fn get_item_as(&self, position: i64, blend: Blend) -> Option<AnimationItem> {
        let mut item = self.item_at(self.wrap(position), blend)?;
        item.frame = position;
        Some(item)
    }

    fn item_at(&self, position: i64, blend: Blend) -> Option<AnimationItem> {
        let keys = &self.keyframes;
        let after = keys.partition_point(|k| k.frame <= position);
        let held = |key: &Keyframe, is_key: bool| AnimationItem {
            frame: position,
            value: key.value.clone(),
            kind: key.kind,
            is_key,
        };
        if after == 0 {
            return keys.first().map(|first| held(first, false));
        }
        let left = after - 1;
        let key = &keys[left];
        if key.frame == position {
            return Some(held(key, true));
        }
        let Some(next) = keys.get(after) else {
            return Some(held(key, false));
        };
        let before = &keys[left.saturating_sub(1)];
        let beyond = keys.get(after + 1).unwrap_or(next);
        let progress = (position - key.frame) as f64 / (next.frame - key.frame) as f64;
        let value = interp::interpolate(
            [&before.value, &key.value, &next.value, &beyond.value],
            progress,
            key.kind,
            blend,
            self.fps,
            self.locale,
        );
        Some(AnimationItem {
            frame: position,
            value,
            kind: key.kind,
            is_key: false,
        })
    }

    pub fn is_key(&self, position: i64) -> bool {
        self.keyframes
            .binary_search_by_key(&position, |k| k.frame)
            .is_ok()
    }

    /// Insert or replace the keyframe at `frame`.
    pub fn insert(&mut self, frame: i64, value: impl Into<PropertyValue>, kind: KeyframeType) {
        self.put(Keyframe::new(frame, value, kind));
        self.touch();
    }

    /// Remove the keyframe at exactly `frame`. Returns whether one existed.
    pub fn remove(&mut self, frame: i64) -> bool {
        match self.keyframes.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => {
                self.keyframes.remove(i);
                self.touch();
                true
            }
            Err(_) => false,
        }
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
        self.touch();
    }

    pub fn key_count(&self) -> usize {
        self.keyframes.len()
    }

    pub fn key_get(&self, index: usize) -> Option<AnimationItem> {
        self.keyframes.get(index).map(AnimationItem::from_key)
    }

    /// First keyframe at or after `position`.
    pub fn next_key(&self, position: i64) -> Option<AnimationItem> {
        let i = self.keyframes.partition_point(|k| k.frame < position);
        self.key_get(i)
    }

    /// Last keyframe at or before `position`.
    pub fn prev_key(&self, position: i64) -> Option<AnimationItem> {
        let i = self.keyframes.partition_point(|k| k.frame <= position);
        i.checked_sub(1).and_then(|i| self.key_get(i))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.keyframes.len() {
            Ok(())
        } else {
            Err(AnimationError::KeyIndexOutOfRange {
                index,
                count: self.keyframes.len(),
            })
        }
    }

    /// Move the keyframe at `index` to `frame`, keeping the list sorted.
    pub fn key_set_frame(&mut self, index: usize, frame: i64) -> Result<()> {
        self.check_index(index)?;
        let occupied = self
            .keyframes
            .iter()
            .enumerate()
            .any(|(i, k)| i != index && k.frame == frame);
        if occupied {
            return Err(AnimationError::FrameOccupied { frame });
        }
        self.keyframes[index].frame = frame;
        self.keyframes.sort_by_key(|k| k.frame);
        self.touch();
        Ok(())
    }

    pub fn key_set_type(&mut self, index: usize, kind: KeyframeType) -> Result<()> {
        self.check_index(index)?;
        self.keyframes[index].kind = kind;
        self.touch();
        Ok(())
    }

    /// Move every keyframe by `delta` frames.
    pub fn shift_frames(&mut self, delta: i64) {
        if delta == 0 {
            return;
        }
        for key in &mut self.keyframes {
            key.frame += delta;
        }
        self.touch();
    }

    /// Convert keyframe text into typed colors or rects so the animation
    /// serializes canonically. Values that do not parse are left alone.
    pub fn coerce(&mut self, blend: Blend) {
        let locale = self.locale;
        let mut changed = false;
        for key in &mut self.keyframes {
            let typed = match blend {
                Blend::Color if key.value.kind() != propanim_value_core::ValueKind::Color => {
                    key.value.try_color().ok().map(PropertyValue::from)
                }
                Blend::Rect if key.value.kind() != propanim_value_core::ValueKind::Rect => {
                    key.value.try_rect(locale).ok().map(PropertyValue::from)
                }
                _ => None,
            };
            if let Some(typed) = typed {
                key.value = typed;
                changed = true;
            }
        }
        if changed {
            self.touch();
        }
    }

    fn write_entry(&self, out: &mut String, frame: i64, kind: KeyframeType, value: &PropertyValue) {
        if !out.is_empty() {
            out.push(';');
        }
        let text = value.get_string(self.locale).unwrap_or_default();
        out.push_str(&frame.to_string());
        out.push_str(kind.marker());
        out.push('=');
        out.push_str(&quote_if_needed(text));
    }

    /// Every keyframe in ascending order in the keyframe grammar.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for key in &self.keyframes {
            self.write_entry(&mut out, key.frame, key.kind, &key.value);
        }
        out
    }

    /// Keyframes between `in_point` and `out_point`, re-based so `in_point`
    /// is frame 0. `-1` selects the start and the length respectively.
    ///
    /// The cut is seeded with the value at `in_point` and cropped with the
    /// value at `out_point` when keyframes continue past it.
    pub fn serialize_cut(&self, in_point: i64, out_point: i64) -> String {
        let in_point = in_point.max(0);
        let out_point = if out_point < 0 {
            self.get_length()
        } else {
            out_point
        };
        let mut out = String::new();
        let (Some(first), Some(last)) = (self.keyframes.first(), self.keyframes.last()) else {
            return out;
        };
        if first.frame <= in_point {
            if let Some(seed) = self.item_at(in_point, Blend::Auto) {
                self.write_entry(&mut out, 0, seed.kind, &seed.value);
            }
        }
        for key in &self.keyframes {
            if key.frame > in_point && key.frame <= out_point {
                self.write_entry(&mut out, key.frame - in_point, key.kind, &key.value);
            }
        }
        if last.frame > out_point && out_point > in_point && !self.is_key(out_point) {
            if let Some(crop) = self.item_at(out_point, Blend::Auto) {
                self.write_entry(&mut out, out_point - in_point, crop.kind, &crop.value);
            }
        }
        out
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
