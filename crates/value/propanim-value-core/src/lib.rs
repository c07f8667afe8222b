//! Property value core.
//!
//! Engine-agnostic building blocks shared by the animation and store crates:
//! the polymorphic [`PropertyValue`] cell, [`Color`] and [`Rect`] with their
//! textual forms, explicit numeric [`Locale`] handling, timecode conversion
//! and the minimal `@` expression evaluator.

pub mod color;
pub mod error;
pub mod expression;
pub mod locale;
pub mod number;
pub mod rect;
pub mod timecode;
pub mod value;

pub use color::Color;
pub use error::{PropertyError, Result};
pub use expression::{NoScope, Scope};
pub use locale::Locale;
pub use rect::Rect;
pub use timecode::TimeFormat;
pub use value::{OpaqueData, PropertyValue, ValueKind};
