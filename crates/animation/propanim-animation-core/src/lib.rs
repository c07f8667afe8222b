//! Property animation core (engine-agnostic)
//!
//! Keyframe animations over [`PropertyValue`]s: the textual keyframe grammar,
//! discrete/linear/smooth interpolation of numbers, colors and rects, and the
//! [`Property`] slot that keeps a value string and its animation in step.

pub mod animation;
pub mod error;
pub mod interp;
pub mod keyframe;
pub mod property;

// Re-exports for consumers
pub use animation::Animation;
pub use error::{AnimationError, Result};
pub use interp::Blend;
pub use keyframe::{AnimationItem, Keyframe, KeyframeType};
pub use property::{AnimationMut, Property};
pub use propanim_value_core::{Color, Locale, PropertyValue, Rect};
