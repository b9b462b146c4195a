//! Named, value-holding slots bound to a validator.

use std::fmt;

use crate::fields::Named;
use crate::models::formatter::{DATETIME_FORMAT, DATE_FORMAT};
use crate::validation::{Constraint, ConstraintError, Validator};
use crate::value::Value;

/// The specialization a field was built as. Determines its fixed
/// constraint set and, for dates, the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Generic,
    PositiveInteger,
    ModelId,
    String,
    /// Wire booleans: the strings `"true"` and `"false"`.
    Boolean,
    Date { format: String },
    DateTime { format: String },
    Select,
    MultiSelect,
}

#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    value: Value,
    validator: Validator,
    kind: FieldKind,
}

impl Field {
    /// A generic field with an empty validator.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_validator(name, Validator::default())
    }

    pub fn with_validator(name: impl Into<String>, validator: Validator) -> Self {
        Self::build(name, FieldKind::Generic, validator)
    }

    fn build(name: impl Into<String>, kind: FieldKind, validator: Validator) -> Self {
        Self {
            name: name.into(),
            value: Value::Null,
            validator,
            kind,
        }
    }

    pub fn positive_integer(name: impl Into<String>) -> Self {
        Self::build(
            name,
            FieldKind::PositiveInteger,
            Validator::new([Constraint::is_positive_integer()]),
        )
    }

    /// A positive integer naming a record.
    pub fn model_id(name: impl Into<String>) -> Self {
        Self::build(
            name,
            FieldKind::ModelId,
            Validator::new([Constraint::is_positive_integer()]),
        )
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::build(
            name,
            FieldKind::String,
            Validator::new([Constraint::is_string()]),
        )
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::build(
            name,
            FieldKind::Boolean,
            Validator::new([Constraint::is_boolean()]),
        )
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::build(
            name,
            FieldKind::Date {
                format: DATE_FORMAT.to_string(),
            },
            Validator::new([Constraint::is_date()]),
        )
    }

    pub fn date_time(name: impl Into<String>) -> Self {
        Self::build(
            name,
            FieldKind::DateTime {
                format: DATETIME_FORMAT.to_string(),
            },
            Validator::new([Constraint::is_date_time()]),
        )
    }

    pub fn select<T: Into<Value>>(
        name: impl Into<String>,
        options: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::build(
            name,
            FieldKind::Select,
            Validator::new([Constraint::selection(options)]),
        )
    }

    /// A list of values, each drawn from `options`.
    pub fn multi_select<T: Into<Value>>(
        name: impl Into<String>,
        options: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::build(
            name,
            FieldKind::MultiSelect,
            Validator::new([Constraint::selection(options), Constraint::is_list()]),
        )
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.set_required(is_required);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn validator_mut(&mut self) -> &mut Validator {
        &mut self.validator
    }

    pub fn set_validator(&mut self, validator: Validator) {
        self.validator = validator;
    }

    pub fn is_required(&self) -> bool {
        self.validator.is_required()
    }

    pub fn set_required(&mut self, is_required: bool) {
        self.validator.set_required(is_required);
    }

    /// The wire format of date and datetime fields.
    pub fn format(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Date { format } | FieldKind::DateTime { format } => Some(format),
            _ => None,
        }
    }

    pub fn set_format(&mut self, new_format: impl Into<String>) -> bool {
        match &mut self.kind {
            FieldKind::Date { format } | FieldKind::DateTime { format } => {
                *format = new_format.into();
                true
            }
            _ => false,
        }
    }

    /// Allowed options of select fields.
    pub fn options(&self) -> Option<&[Value]> {
        self.validator.selection().and_then(Constraint::options)
    }

    /// Replace the allowed options; validation follows immediately.
    pub fn set_options<T: Into<Value>>(&mut self, options: impl IntoIterator<Item = T>) -> bool {
        match self.validator.selection_mut() {
            Some(selection) => selection.set_options(options.into_iter().map(Into::into).collect()),
            None => false,
        }
    }

    pub fn validate(&self) -> Result<(), ConstraintError> {
        self.validator.validate(&self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.validator.is_valid(&self.value)
    }
}

impl Named for Field {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Same name, same value, same validator.
impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value && self.validator == other.validator
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field `{}` = {}", self.name, self.value)
    }
}
