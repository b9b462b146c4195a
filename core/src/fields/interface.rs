//! Definition-only parameter fields.
//!
//! # Design
//! An `InterfaceField` owns a template `Field` describing an externally
//! settable parameter or header. It never holds a value of its own; `bind`
//! checks a candidate value against the template and hands back a fresh
//! `Field` of the same kind. Its name is suffixed so a set can hold a
//! definition and a realized field side by side without collisions.

use std::fmt;

use crate::fields::{Field, Named};
use crate::validation::ConstraintError;
use crate::value::Value;

const SUFFIX: &str = "_interface_field";

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceField {
    name: String,
    base: Field,
}

impl InterfaceField {
    pub fn new(base: Field) -> Self {
        Self {
            name: format!("{}{SUFFIX}", base.name()),
            base,
        }
    }

    pub fn base(&self) -> &Field {
        &self.base
    }

    /// The name bindings are looked up by.
    pub fn base_name(&self) -> &str {
        self.base.name()
    }

    pub fn validate(&self, value: &Value) -> Result<(), ConstraintError> {
        self.base.validator().validate(value)
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.base.validator().is_valid(value)
    }

    /// Validate `value` strictly and produce a realized field carrying it.
    pub fn bind(&self, value: impl Into<Value>) -> Result<Field, ConstraintError> {
        let value = value.into();
        self.validate(&value)?;
        Ok(self.base.clone().with_value(value))
    }
}

impl From<Field> for InterfaceField {
    fn from(base: Field) -> Self {
        Self::new(base)
    }
}

impl Named for InterfaceField {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for InterfaceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interface Field `{}`", self.name)
    }
}
