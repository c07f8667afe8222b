//! Property store facade.
//!
//! [`PropertyStore`] maps names to property slots in insertion order. Values
//! are read and written in any representation, `@` expressions resolve other
//! names in the same store, and every name can carry a keyframe animation.

pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::{Result, StoreError};
pub use store::{PropertyStore, SharedStore};

pub use propanim_animation_core::{Animation, AnimationMut, Blend, KeyframeType};
pub use propanim_value_core::{Color, Locale, OpaqueData, PropertyValue, Rect, TimeFormat};
