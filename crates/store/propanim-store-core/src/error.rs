//! Error types for store bookkeeping.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("no property named {name:?}")]
    UnknownName { name: String },

    #[error("a property named {name:?} already exists")]
    NameTaken { name: String },

    /// Text handed to `parse` without a `name=value` shape.
    #[error("expected name=value, got {input:?}")]
    MalformedAssignment { input: String },
}

impl StoreError {
    pub fn category(&self) -> &'static str {
        match self {
            StoreError::UnknownName { .. } => "name",
            StoreError::NameTaken { .. } => "name",
            StoreError::MalformedAssignment { .. } => "parse",
        }
    }

    /// Store errors reject the operation and leave the store unchanged.
    pub fn is_recoverable(&self) -> bool {
        false
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
