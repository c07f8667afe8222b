//! Keyframes and query results.

use propanim_value_core::PropertyValue;
use serde::{Deserialize, Serialize};

/// How a keyframe blends toward the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyframeType {
    /// Hold the value until the next keyframe.
    Discrete,
    #[default]
    Linear,
    /// Catmull-Rom spline through the neighbouring keyframes.
    Smooth,
}

impl KeyframeType {
    /// Marker written before `=` in the keyframe grammar.
    pub fn marker(self) -> &'static str {
        match self {
            KeyframeType::Discrete => "|",
            KeyframeType::Linear => "",
            KeyframeType::Smooth => "~",
        }
    }

    /// Kind named by the character preceding `=`, if it is a marker.
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '|' | '!' => Some(KeyframeType::Discrete),
            '~' => Some(KeyframeType::Smooth),
            _ => None,
        }
    }
}

/// A stored sample of an animated property.
#[derive(Debug, Clone)]
pub struct Keyframe {
    pub frame: i64,
    pub value: PropertyValue,
    pub kind: KeyframeType,
}

impl Keyframe {
    pub fn new(frame: i64, value: impl Into<PropertyValue>, kind: KeyframeType) -> Self {
        Self {
            frame,
            value: value.into(),
            kind,
        }
    }
}

/// The value of an animation at a queried position.
#[derive(Debug, Clone)]
pub struct AnimationItem {
    /// The queried position (or the keyframe's frame for key lookups).
    pub frame: i64,
    pub value: PropertyValue,
    /// Kind of the governing (left) keyframe.
    pub kind: KeyframeType,
    /// True only when the position is a stored keyframe.
    pub is_key: bool,
}

impl AnimationItem {
    pub(crate) fn from_key(key: &Keyframe) -> Self {
        Self {
            frame: key.frame,
            value: key.value.clone(),
            kind: key.kind,
            is_key: true,
        }
    }
}
