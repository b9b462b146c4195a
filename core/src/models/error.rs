//! Error types for the model mapper.

use thiserror::Error;

use crate::value::Value;

/// A value that could not be read as a date or datetime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("The provided value {value} is not date-like.")]
    NotDate { value: Value },

    #[error("The provided value {value} is not datetime-like.")]
    NotDateTime { value: Value },
}

/// A model attribute assignment that failed coercion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("expected {expected}, found {value}")]
    UnexpectedValue { expected: &'static str, value: Value },

    /// Failure while assigning a named attribute.
    #[error("invalid value for attribute `{attribute}`: {source}")]
    Attribute {
        attribute: String,
        #[source]
        source: Box<ModelError>,
    },
}

impl ModelError {
    pub fn unexpected(expected: &'static str, value: Value) -> Self {
        ModelError::UnexpectedValue { expected, value }
    }

    /// Attach the attribute name to a coercion failure.
    pub fn attribute(attribute: impl Into<String>, source: ModelError) -> Self {
        ModelError::Attribute {
            attribute: attribute.into(),
            source: Box::new(source),
        }
    }
}
