//! Error types for constraint and interface validation.
//!
//! # Design
//! Every strict-mode failure is a `ConstraintError`. The variant names the
//! violated rule so callers can react to a narrow kind (a missing value, a
//! wrong type, a floor, an unknown option). `InterfaceValidationError` is the
//! envelope produced by bulk validation of a binding dictionary and carries
//! the offending parameter name and value alongside the underlying error.

use thiserror::Error;

use crate::value::{Value, ValueKind};

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    /// A non-nullable constraint received no value.
    #[error("Field value cannot be None")]
    NullField,

    /// Generic type mismatch for kinds without a dedicated variant.
    #[error("Field value `{value}` is not an instance of `{expected}`")]
    TypeMismatch { value: Value, expected: ValueKind },

    #[error("Field value `{value}` is not an instance of `number`")]
    NumericValue { value: Value },

    #[error("Field value `{value}` is not an instance of `int`")]
    IntegerValue { value: Value },

    #[error("Field value `{value}` is not greater than the minimum value `{min_value}`")]
    NotGreaterThan { value: Value, min_value: f64 },

    #[error("Field value `{value}` is not an instance of `str`")]
    StringValue { value: Value },

    /// Wire booleans are the strings `"true"` and `"false"`.
    #[error("Field value `{value}` is not a boolean string (\"true\", \"false\")")]
    BooleanValue { value: Value },

    #[error("Field value `{value}` is not an instance of `date`")]
    DateValue { value: Value },

    #[error("Field value `{value}` is not an instance of `datetime`")]
    DateTimeValue { value: Value },

    #[error("Field value `{value}` is not an instance of `list`")]
    ListValue { value: Value },

    #[error("Field value `{value}` is not contained in `{}`", render_options(.options))]
    SelectionValue { value: Value, options: Vec<Value> },
}

fn render_options(options: &[Value]) -> String {
    Value::List(options.to_vec()).to_string()
}

impl ConstraintError {
    /// The failure reported when `value` is not of kind `expected`.
    pub fn for_kind(expected: ValueKind, value: &Value) -> Self {
        let value = value.clone();
        match expected {
            ValueKind::Int => ConstraintError::IntegerValue { value },
            ValueKind::Float => ConstraintError::NumericValue { value },
            ValueKind::String => ConstraintError::StringValue { value },
            ValueKind::Bool => ConstraintError::BooleanValue { value },
            ValueKind::Date => ConstraintError::DateValue { value },
            ValueKind::DateTime => ConstraintError::DateTimeValue { value },
            ValueKind::List => ConstraintError::ListValue { value },
            ValueKind::Null | ValueKind::Map => ConstraintError::TypeMismatch { value, expected },
        }
    }

    /// Whether the failure is a type mismatch rather than a missing value or
    /// an out-of-range value.
    pub fn is_type_mismatch(&self) -> bool {
        !matches!(
            self,
            ConstraintError::NullField
                | ConstraintError::NotGreaterThan { .. }
                | ConstraintError::SelectionValue { .. }
        )
    }
}

/// A binding that failed strict validation against an interface field set.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid Field Assignment: {field}={value} ({source}).")]
pub struct InterfaceValidationError {
    /// Base name of the interface field.
    pub field: String,
    /// The offending bound value (`Null` when absent).
    pub value: Value,
    #[source]
    pub source: ConstraintError,
}

impl InterfaceValidationError {
    pub fn new(field: impl Into<String>, value: Value, source: ConstraintError) -> Self {
        Self {
            field: field.into(),
            value,
            source,
        }
    }

    /// The underlying constraint message.
    pub fn message(&self) -> String {
        self.source.to_string()
    }
}
