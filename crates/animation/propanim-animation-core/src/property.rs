//! A property slot: a scalar value with an optional bound animation.
//!
//! The slot keeps its string and its animation in step. An animation is
//! bound lazily from the string on the first animated read; every edit made
//! through [`AnimationMut`] is written back into the string when the guard
//! goes out of scope.

use crate::animation::Animation;
use crate::interp::Blend;
use crate::keyframe::{AnimationItem, KeyframeType};
use propanim_value_core::{Color, Locale, PropertyValue, Rect};
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, Default)]
pub struct Property {
    value: PropertyValue,
    animation: Option<Animation>,
    /// Animation revision the string was last written from.
    synced: u64,
}

/// Rewrite `value` from `animation` if it changed since the last sync.
fn sync_slot(animation: &mut Animation, value: &mut PropertyValue, synced: &mut u64) {
    if animation.revision() == *synced {
        return;
    }
    let text = animation.serialize();
    animation.mark_source(&text);
    value.set_string(text);
    *synced = animation.revision();
}

/// Mutable access to a bound animation.
///
/// Dropping the guard re-serializes the animation into the slot's string
/// when any structural edit was made.
pub struct AnimationMut<'a> {
    animation: &'a mut Animation,
    value: &'a mut PropertyValue,
    synced: &'a mut u64,
}

impl Deref for AnimationMut<'_> {
    type Target = Animation;

    fn deref(&self) -> &Animation {
        &*self.animation
    }
}

impl DerefMut for AnimationMut<'_> {
    fn deref_mut(&mut self) -> &mut Animation {
        &mut *self.animation
    }
}

impl Drop for AnimationMut<'_> {
    fn drop(&mut self) {
        sync_slot(self.animation, self.value, self.synced);
    }
}

impl Property {
    pub fn new(value: impl Into<PropertyValue>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Replace the scalar value, dropping any bound animation.
    pub fn set(&mut self, value: impl Into<PropertyValue>) {
        self.value = value.into();
        self.animation = None;
    }

    pub fn clear(&mut self) {
        self.set(PropertyValue::new());
    }

    pub fn reset_caches(&mut self) {
        self.value.reset_caches();
    }

    pub fn is_anim(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    pub fn animation_mut(&mut self) -> Option<AnimationMut<'_>> {
        let Property {
            value,
            animation,
            synced,
        } = self;
        animation.as_mut().map(|animation| AnimationMut {
            animation,
            value,
            synced,
        })
    }

    /// Bind an animation parsed from the current string, re-parsing when the
    /// length, frame rate or locale differ from the bound one.
    pub fn bind(&mut self, fps: f64, locale: Locale, length: i64) -> AnimationMut<'_> {
        let Property {
            value,
            animation,
            synced,
        } = self;
        let text = value.get_string(locale).unwrap_or_default().to_string();
        if animation
            .as_ref()
            .is_some_and(|a| a.fps() != fps || a.locale() != locale)
        {
            log::debug!("rebinding animation at {fps} fps, locale {locale}");
            *animation = None;
        }
        let fresh = animation.is_none();
        let animation =
            animation.get_or_insert_with(|| Animation::parse(&text, length, fps, locale));
        if fresh || animation.refresh(&text, length) {
            *synced = animation.revision();
        }
        AnimationMut {
            animation,
            value,
            synced,
        }
    }

    /// Animated value at `position`, or `None` when there are no keyframes.
    pub fn anim_get(
        &mut self,
        fps: f64,
        locale: Locale,
        position: i64,
        length: i64,
        blend: Blend,
    ) -> Option<AnimationItem> {
        let mut animation = self.bind(fps, locale, length);
        if matches!(blend, Blend::Color | Blend::Rect) {
            animation.coerce(blend);
        }
        animation.get_item_as(position, blend)
    }

    pub fn anim_get_int(&mut self, fps: f64, locale: Locale, position: i64, length: i64) -> i32 {
        self.anim_get(fps, locale, position, length, Blend::Auto)
            .map(|item| item.value.get_int(fps, locale))
            .unwrap_or_default()
    }

    pub fn anim_get_double(
        &mut self,
        fps: f64,
        locale: Locale,
        position: i64,
        length: i64,
    ) -> f64 {
        self.anim_get(fps, locale, position, length, Blend::Auto)
            .map(|item| item.value.get_double(fps, locale))
            .unwrap_or_default()
    }

    pub fn anim_get_string(
        &mut self,
        fps: f64,
        locale: Locale,
        position: i64,
        length: i64,
    ) -> Option<String> {
        let item = self.anim_get(fps, locale, position, length, Blend::Auto)?;
        item.value.get_string(locale).map(str::to_string)
    }

    pub fn anim_get_color(
        &mut self,
        fps: f64,
        locale: Locale,
        position: i64,
        length: i64,
    ) -> Color {
        self.anim_get(fps, locale, position, length, Blend::Color)
            .map(|item| item.value.get_color())
            .unwrap_or_default()
    }

    pub fn anim_get_rect(&mut self, fps: f64, locale: Locale, position: i64, length: i64) -> Rect {
        self.anim_get(fps, locale, position, length, Blend::Rect)
            .map(|item| item.value.get_rect(locale))
            .unwrap_or_default()
    }

    /// Insert a keyframe at `position`.
    ///
    /// On an empty slot with no animation the value is only stored as the
    /// scalar, and `position` and `kind` are not kept. The next call promotes
    /// that scalar to a Linear keyframe at frame 0.
    pub fn anim_set(
        &mut self,
        value: impl Into<PropertyValue>,
        fps: f64,
        locale: Locale,
        position: i64,
        length: i64,
        kind: KeyframeType,
    ) {
        let value = value.into();
        if self.animation.is_none() && self.value.is_empty() {
            self.value = value;
            return;
        }
        self.bind(fps, locale, length).insert(position, value, kind);
    }
}
