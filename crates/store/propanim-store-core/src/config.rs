//! Store configuration.

use propanim_animation_core::KeyframeType;
use propanim_value_core::Locale;
use serde::{Deserialize, Serialize};

/// Frame rate, locale and evaluation limits shared by every property in a
/// store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frames per second used for time strings and animation positions.
    pub fps: f64,
    /// Decimal point convention for numeric text.
    pub locale: Locale,
    /// Kind used by the typed `anim_set_*` helpers.
    pub default_keyframe_type: KeyframeType,
    /// How deep `@` expressions may chain through other `@` properties.
    pub max_expression_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 25.0,
            locale: Locale::C,
            default_keyframe_type: KeyframeType::Linear,
            max_expression_depth: 16,
        }
    }
}
