//! Error types for property value conversion.

/// Failure while converting a property value between representations.
///
/// Getters recover from every variant by returning a default; the fallible
/// `try_*` entry points surface them for callers that want to know.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PropertyError {
    /// The text has no leading numeral.
    #[error("not a number: {input:?}")]
    NotANumber { input: String },

    /// An `@` expression could not be evaluated.
    #[error("invalid expression {expression:?}: {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("invalid color: {input:?}")]
    InvalidColor { input: String },

    #[error("invalid rect: {input:?}")]
    InvalidRect { input: String },

    #[error("invalid timecode: {input:?}")]
    InvalidTimecode { input: String },

    /// A keyframe entry does not follow `POS [|~] = VALUE`.
    #[error("malformed animation entry: {entry:?}")]
    MalformedAnimationGrammar { entry: String },

    /// The value holds nothing that can be converted.
    #[error("property value is empty")]
    Empty,
}

impl PropertyError {
    /// Short machine-friendly name of the failure class.
    pub fn category(&self) -> &'static str {
        match self {
            PropertyError::NotANumber { .. } => "number",
            PropertyError::InvalidExpression { .. } => "expression",
            PropertyError::InvalidColor { .. } => "color",
            PropertyError::InvalidRect { .. } => "rect",
            PropertyError::InvalidTimecode { .. } => "timecode",
            PropertyError::MalformedAnimationGrammar { .. } => "animation",
            PropertyError::Empty => "empty",
        }
    }

    /// Parse failures fall back to a default value; only `Empty` carries no
    /// usable input at all.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PropertyError::Empty)
    }

    pub(crate) fn not_a_number(input: &str) -> Self {
        PropertyError::NotANumber {
            input: input.to_string(),
        }
    }

    pub(crate) fn expression(expression: &str, reason: impl Into<String>) -> Self {
        PropertyError::InvalidExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for value conversions.
pub type Result<T> = std::result::Result<T, PropertyError>;
