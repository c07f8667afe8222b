//! Error types for keyframe editing.

use propanim_value_core::PropertyError;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnimationError {
    /// A keyframe index beyond the end of the list.
    #[error("keyframe index {index} out of range (count {count})")]
    KeyIndexOutOfRange { index: usize, count: usize },

    /// Moving a keyframe onto a frame another keyframe already holds.
    #[error("frame {frame} already holds a keyframe")]
    FrameOccupied { frame: i64 },

    #[error(transparent)]
    Property(#[from] PropertyError),
}

impl AnimationError {
    pub fn category(&self) -> &'static str {
        match self {
            AnimationError::KeyIndexOutOfRange { .. } => "index",
            AnimationError::FrameOccupied { .. } => "frame",
            AnimationError::Property(err) => err.category(),
        }
    }

    /// Index and frame errors reject the edit; property errors fall back to
    /// a default value.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AnimationError::Property(err) => err.is_recoverable(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnimationError>;
