//! Ordered name/value property store.

use crate::config::Config;
use crate::error::{Result, StoreError};
use indexmap::IndexMap;
use propanim_animation_core::{AnimationMut, KeyframeType, Property};
use propanim_value_core::{
    timecode, Color, Locale, OpaqueData, PropertyValue, Rect, Scope, TimeFormat,
};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::{Arc, Mutex};

/// A store shared with other owners, as used by [`PropertyStore::mirror`].
pub type SharedStore = Arc<Mutex<PropertyStore>>;

/// Named properties in insertion order, sharing one frame rate and locale.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    config: Config,
    properties: IndexMap<String, Property>,
    /// Receives a copy of every string written through the setters.
    mirror: Option<SharedStore>,
}

/// Resolves `@` names against the other properties of a store.
struct Siblings<'a> {
    store: &'a PropertyStore,
    depth: usize,
}

impl Scope for Siblings<'_> {
    fn resolve(&self, name: &str) -> Option<f64> {
        let limit = self.store.config.max_expression_depth;
        if self.depth >= limit {
            log::warn!("expression nesting deeper than {limit} while resolving {name:?}");
            return None;
        }
        let property = self.store.properties.get(name)?;
        let inner = Siblings {
            store: self.store,
            depth: self.depth + 1,
        };
        property
            .value()
            .try_double(self.store.config.fps, self.store.config.locale, &inner)
            .ok()
    }
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn scope(&self) -> Siblings<'_> {
        Siblings {
            store: self,
            depth: 0,
        }
    }

    fn slot(&mut self, name: &str) -> &mut Property {
        self.properties.entry(name.to_string()).or_default()
    }

    fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name).map(Property::value)
    }

    /// Copy the current text of `name` into the mirror store.
    fn mirror_entry(&self, name: &str) {
        let (Some(mirror), Some(text)) = (&self.mirror, self.get(name)) else {
            return;
        };
        match mirror.lock() {
            Ok(mut target) => target.set(name, text),
            Err(_) => log::warn!("mirror store is poisoned; {name:?} not copied"),
        }
    }

    // ---- scalar writes ----

    /// Store a value, dropping any animation bound to `name`.
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) {
        self.slot(name).set(value);
        self.mirror_entry(name);
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.set(name, value);
    }

    pub fn set_int64(&mut self, name: &str, value: i64) {
        self.set(name, value);
    }

    pub fn set_double(&mut self, name: &str, value: f64) {
        self.set(name, value);
    }

    pub fn set_color(&mut self, name: &str, value: Color) {
        self.set(name, value);
    }

    pub fn set_rect(&mut self, name: &str, value: Rect) {
        self.set(name, value);
    }

    /// Attach opaque data. Data is never mirrored.
    pub fn set_data(&mut self, name: &str, value: OpaqueData) {
        self.slot(name).set(value);
    }

    // ---- scalar reads ----

    pub fn get(&self, name: &str) -> Option<&str> {
        self.value(name)?.get_string(self.config.locale)
    }

    pub fn get_int(&self, name: &str) -> i32 {
        self.value(name).map_or(0, |v| {
            v.get_int_in(self.config.fps, self.config.locale, &self.scope())
        })
    }

    pub fn get_int64(&self, name: &str) -> i64 {
        self.value(name).map_or(0, |v| {
            v.get_int64_in(self.config.fps, self.config.locale, &self.scope())
        })
    }

    pub fn get_double(&self, name: &str) -> f64 {
        self.value(name).map_or(0.0, |v| {
            v.get_double_in(self.config.fps, self.config.locale, &self.scope())
        })
    }

    pub fn get_color(&self, name: &str) -> Color {
        self.value(name).map(PropertyValue::get_color).unwrap_or_default()
    }

    pub fn get_rect(&self, name: &str) -> Rect {
        self.value(name)
            .map(|v| v.get_rect(self.config.locale))
            .unwrap_or_default()
    }

    pub fn get_data<T: Any>(&self, name: &str) -> Option<&T> {
        self.value(name)?.get_data::<T>()
    }

    // ---- animation ----

    /// Insert a keyframe for `name` at `position`.
    ///
    /// The first call on an unset name only stores the scalar; a later call
    /// promotes it to the keyframe at frame 0.
    pub fn anim_set(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
        position: i64,
        length: i64,
        kind: KeyframeType,
    ) {
        let (fps, locale) = (self.config.fps, self.config.locale);
        self.slot(name)
            .anim_set(value, fps, locale, position, length, kind);
        self.mirror_entry(name);
    }

    pub fn anim_set_int(&mut self, name: &str, value: i32, position: i64, length: i64) {
        let kind = self.config.default_keyframe_type;
        self.anim_set(name, value, position, length, kind);
    }

    pub fn anim_set_double(&mut self, name: &str, value: f64, position: i64, length: i64) {
        let kind = self.config.default_keyframe_type;
        self.anim_set(name, value, position, length, kind);
    }

    /// String keyframes never blend, so they are always discrete.
    pub fn anim_set_string(&mut self, name: &str, value: &str, position: i64, length: i64) {
        self.anim_set(name, value, position, length, KeyframeType::Discrete);
    }

    pub fn anim_set_color(&mut self, name: &str, value: Color, position: i64, length: i64) {
        let kind = self.config.default_keyframe_type;
        self.anim_set(name, value, position, length, kind);
    }

    pub fn anim_set_rect(&mut self, name: &str, value: Rect, position: i64, length: i64) {
        let kind = self.config.default_keyframe_type;
        self.anim_set(name, value, position, length, kind);
    }

    pub fn anim_get_int(&mut self, name: &str, position: i64, length: i64) -> i32 {
        let (fps, locale) = (self.config.fps, self.config.locale);
        self.properties
            .get_mut(name)
            .map_or(0, |p| p.anim_get_int(fps, locale, position, length))
    }

    pub fn anim_get_double(&mut self, name: &str, position: i64, length: i64) -> f64 {
        let (fps, locale) = (self.config.fps, self.config.locale);
        self.properties
            .get_mut(name)
            .map_or(0.0, |p| p.anim_get_double(fps, locale, position, length))
    }

    pub fn anim_get_string(&mut self, name: &str, position: i64, length: i64) -> Option<String> {
        let (fps, locale) = (self.config.fps, self.config.locale);
        self.properties
            .get_mut(name)?
            .anim_get_string(fps, locale, position, length)
    }

    pub fn anim_get_color(&mut self, name: &str, position: i64, length: i64) -> Color {
        let (fps, locale) = (self.config.fps, self.config.locale);
        self.properties
            .get_mut(name)
            .map(|p| p.anim_get_color(fps, locale, position, length))
            .unwrap_or_default()
    }

    pub fn anim_get_rect(&mut self, name: &str, position: i64, length: i64) -> Rect {
        let (fps, locale) = (self.config.fps, self.config.locale);
        self.properties
            .get_mut(name)
            .map(|p| p.anim_get_rect(fps, locale, position, length))
            .unwrap_or_default()
    }

    /// Live handle on the animation bound to `name`.
    ///
    /// Edits through the handle are written back to the property's string
    /// when it is dropped.
    pub fn get_animation(&mut self, name: &str) -> Option<AnimationMut<'_>> {
        self.properties.get_mut(name)?.animation_mut()
    }

    pub fn is_anim(&self, name: &str) -> bool {
        self.properties.get(name).is_some_and(Property::is_anim)
    }

    // ---- entries ----

    pub fn exists(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Remove `name`; later entries keep their relative order.
    pub fn clear(&mut self, name: &str) {
        self.properties.shift_remove(name);
    }

    pub fn count(&self) -> usize {
        self.properties.len()
    }

    pub fn get_name(&self, index: usize) -> Option<&str> {
        self.properties.get_index(index).map(|(name, _)| name.as_str())
    }

    pub fn get_value(&self, index: usize) -> Option<&str> {
        self.properties
            .get_index(index)
            .and_then(|(_, p)| p.value().get_string(self.config.locale))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> + '_ {
        self.properties
            .iter()
            .map(|(name, p)| (name.as_str(), p.value()))
    }

    /// Give the property `from` the name `to`, keeping its position.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        if self.properties.contains_key(to) {
            return Err(StoreError::NameTaken {
                name: to.to_string(),
            });
        }
        let (index, _, property) =
            self.properties
                .shift_remove_full(from)
                .ok_or_else(|| StoreError::UnknownName {
                    name: from.to_string(),
                })?;
        self.properties.shift_insert(index, to.to_string(), property);
        Ok(())
    }

    /// Copy every property of `other` whose name starts with `prefix`, with
    /// the prefix removed. Returns how many were copied.
    pub fn pass(&mut self, other: &PropertyStore, prefix: &str) -> usize {
        let mut copied = 0;
        for (name, property) in &other.properties {
            if let Some(stripped) = name.strip_prefix(prefix) {
                self.set(stripped, property.value().clone());
                copied += 1;
            }
        }
        copied
    }

    /// Copy every property of `other`, replacing same-named entries.
    pub fn inherit(&mut self, other: &PropertyStore) {
        self.pass(other, "");
    }

    /// Copy the property `name` of `other` under the same name. Returns
    /// whether `other` had it.
    pub fn pass_property(&mut self, other: &PropertyStore, name: &str) -> bool {
        let Some(property) = other.properties.get(name) else {
            return false;
        };
        self.set(name, property.value().clone());
        true
    }

    /// Copy the properties of `other` named in `list`. Names are separated
    /// by any mix of spaces, commas, tabs and newlines. Returns how many
    /// were copied.
    pub fn pass_list(&mut self, other: &PropertyStore, list: &str) -> usize {
        let mut copied = 0;
        for name in list.split([' ', ',', '\t', '\n']) {
            if !name.is_empty() && self.pass_property(other, name) {
                copied += 1;
            }
        }
        copied
    }

    /// Copy every later write through the setters into `target` as text.
    /// Entries already present are not copied.
    pub fn mirror(&mut self, target: SharedStore) {
        self.mirror = Some(target);
    }

    pub fn stop_mirror(&mut self) {
        self.mirror = None;
    }

    /// True when every name starts with a digit, as in `0`, `1`, `2`.
    pub fn is_sequence(&self) -> bool {
        self.properties
            .keys()
            .all(|name| name.starts_with(|c: char| c.is_ascii_digit()))
    }

    /// Apply a `name=value` assignment. Matched surrounding double quotes
    /// are removed from the value.
    pub fn parse(&mut self, assignment: &str) -> Result<()> {
        let (name, value) =
            assignment
                .split_once('=')
                .ok_or_else(|| StoreError::MalformedAssignment {
                    input: assignment.to_string(),
                })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::MalformedAssignment {
                input: assignment.to_string(),
            });
        }
        self.set(name, strip_quotes(value));
        Ok(())
    }

    // ---- time ----

    /// The frame value of `name` formatted as time text.
    pub fn get_time(&self, name: &str, format: TimeFormat) -> Option<String> {
        let value = self.value(name)?;
        let frames = value.get_int64_in(self.config.fps, self.config.locale, &self.scope());
        Some(timecode::format_time(frames, self.config.fps, format))
    }

    pub fn frames_to_time(&self, frames: i64, format: TimeFormat) -> String {
        timecode::format_time(frames, self.config.fps, format)
    }

    /// Frame count of a time or frame string; unparsable text gives 0.
    pub fn time_to_frames(&self, text: &str) -> i64 {
        PropertyValue::from(text).get_int64(self.config.fps, self.config.locale)
    }

    // ---- settings ----

    pub fn fps(&self) -> f64 {
        self.config.fps
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.config.fps = fps;
    }

    pub fn locale(&self) -> Locale {
        self.config.locale
    }

    /// Change the locale; cached text and numbers are recomputed on next read.
    pub fn set_locale(&mut self, locale: Locale) {
        self.config.locale = locale;
        for property in self.properties.values_mut() {
            property.reset_caches();
        }
    }

    // ---- json ----

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    // ---- yaml ----

    /// Read a YAML document. A mapping sets one property per key; a
    /// sequence sets `0`, `1`, ... in order. An `LC_NUMERIC` key also sets
    /// the store locale.
    pub fn from_yaml_str(yaml: &str) -> serde_yaml::Result<Self> {
        let mut store = PropertyStore::new();
        match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
            serde_yaml::Value::Mapping(entries) => {
                for (name, value) in entries {
                    let name = RawScalar::deserialize(name)?.into_text();
                    let value = RawScalar::deserialize(value)?.into_text();
                    if name == "LC_NUMERIC" {
                        store.set_locale(Locale::from_name(&value));
                    }
                    store.set(&name, value);
                }
            }
            serde_yaml::Value::Sequence(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    store.set(&index.to_string(), RawScalar::deserialize(item)?.into_text());
                }
            }
            serde_yaml::Value::Null => {}
            _ => {
                return Err(de::Error::custom(
                    "expected a mapping or a sequence of properties",
                ))
            }
        }
        Ok(store)
    }

    /// Write the store as YAML. Names starting with `_` and empty values are
    /// left out; a sequence store is written as a YAML sequence.
    pub fn to_yaml_string(&self) -> serde_yaml::Result<String> {
        let locale = self.config.locale;
        let entries: IndexMap<&str, &str> = self
            .properties
            .iter()
            .filter(|(name, _)| !name.starts_with('_'))
            .filter_map(|(name, p)| Some((name.as_str(), p.value().get_string(locale)?)))
            .filter(|(_, value)| !value.is_empty())
            .collect();
        if !entries.is_empty() && self.is_sequence() {
            serde_yaml::to_string(&entries.values().collect::<Vec<_>>())
        } else {
            serde_yaml::to_string(&entries)
        }
    }
}

/// A scalar of any serialized type, kept as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Null,
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Boolean(b) => u8::from(b).to_string(),
            RawScalar::Integer(n) => n.to_string(),
            RawScalar::Number(n) => n.to_string(),
            RawScalar::String(s) => s,
            RawScalar::Null => String::new(),
        }
    }
}

impl Serialize for PropertyStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let locale = self.config.locale;
        let entries: Vec<(&str, &str)> = self
            .properties
            .iter()
            .filter_map(|(name, p)| Some((name.as_str(), p.value().get_string(locale)?)))
            .collect();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, value) in entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropertyStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = IndexMap::<String, RawScalar>::deserialize(deserializer)?;
        let mut store = PropertyStore::new();
        for (name, value) in entries {
            store.set(&name, value.into_text());
        }
        Ok(store)
    }
}
