//! Ordered, duplicate-free constraint container with a required flag.
//!
//! # Design
//! The required flag is derived state: it is `true` exactly when the
//! `IsRequired` marker is present. Toggling it rewrites the `nullable` flag of
//! every contained constraint, so a required validator rejects a null value
//! through every constraint, not only through the marker.

use crate::validation::constraint::Constraint;
use crate::validation::error::ConstraintError;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct Validator {
    constraints: Vec<Constraint>,
    is_required: bool,
}

impl Validator {
    pub fn new(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        let mut validator = Self::default();
        validator.extend(constraints);
        validator
    }

    /// Builder-style variant of [`Validator::set_required`].
    pub fn required(mut self, is_required: bool) -> Self {
        self.set_required(is_required);
        self
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn contains(&self, constraint: &Constraint) -> bool {
        self.constraints.contains(constraint)
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    /// Append `constraint` unless an equal one is already present.
    ///
    /// Adding the `IsRequired` marker makes the validator required. A
    /// constraint joining an already-required validator loses its nullability.
    pub fn add(&mut self, mut constraint: Constraint) {
        if self.is_required {
            constraint.set_nullable(false);
        }
        if self.constraints.contains(&constraint) {
            return;
        }
        let marks_required = constraint.is_required_marker();
        self.constraints.push(constraint);
        if marks_required && !self.is_required {
            self.set_required(true);
        }
    }

    pub fn extend(&mut self, constraints: impl IntoIterator<Item = Constraint>) {
        for constraint in constraints {
            self.add(constraint);
        }
    }

    /// Remove `constraint` if present. Removing the `IsRequired` marker makes
    /// the validator optional again.
    pub fn remove(&mut self, constraint: &Constraint) {
        let before = self.constraints.len();
        self.constraints.retain(|existing| existing != constraint);
        if self.constraints.len() != before && constraint.is_required_marker() && self.is_required
        {
            self.set_required(false);
        }
    }

    pub fn set_required(&mut self, is_required: bool) {
        self.is_required = is_required;
        for constraint in &mut self.constraints {
            constraint.set_nullable(!is_required);
        }
        let marker = Constraint::is_required();
        let has_marker = self.constraints.contains(&marker);
        if is_required && !has_marker {
            self.constraints.push(marker);
        } else if !is_required && has_marker {
            self.constraints.retain(|existing| !existing.is_required_marker());
        }
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
        self.is_required = false;
    }

    /// Mutable access to the first selection constraint, if any.
    pub(crate) fn selection_mut(&mut self) -> Option<&mut Constraint> {
        self.constraints
            .iter_mut()
            .find(|constraint| constraint.options().is_some())
    }

    pub(crate) fn selection(&self) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|constraint| constraint.options().is_some())
    }

    /// Strict check against every constraint in insertion order.
    pub fn validate(&self, value: &Value) -> Result<(), ConstraintError> {
        self.constraints
            .iter()
            .try_for_each(|constraint| constraint.validate(value))
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }
}

/// Order-independent: same constraint set.
impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        self.constraints.len() == other.constraints.len()
            && self
                .constraints
                .iter()
                .all(|constraint| other.constraints.contains(constraint))
    }
}

impl Eq for Validator {}
