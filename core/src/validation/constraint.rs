//! Single-value constraints.
//!
//! # Design
//! A `Constraint` is a `(ConstraintKind, nullable)` pair. Null handling is
//! shared by every kind: a null value passes a nullable constraint without
//! reaching the predicate and fails a non-nullable one with `NullField`.
//! Composite kinds are conjunctions of simpler kinds evaluated in order, so
//! `IsPositiveInteger` reports `IntegerValue` before `NotGreaterThan`.
//!
//! Equality and hashing cover the kind, its configuration and the nullable
//! flag. Selection options compare as sets, so option order and duplicates
//! do not matter.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::validation::error::ConstraintError;
use crate::value::{Value, ValueKind};

/// The predicate half of a constraint.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    /// Value is of the given kind.
    IsType { data_type: ValueKind },
    /// Integer or float. Booleans are not numeric.
    IsNumeric,
    IsInteger,
    /// Numeric and strictly greater than `min_value`.
    IsGreaterThan { min_value: f64 },
    IsPositiveInteger,
    IsString,
    /// One of the wire strings `"true"` / `"false"`.
    IsBoolean,
    IsDate,
    IsDateTime,
    IsList,
    IsRequired,
    /// Every element (a scalar counts as a one-element list) is one of
    /// `options`, compared variant-exactly.
    Selection { options: Vec<Value> },
}

impl ConstraintKind {
    fn name(&self) -> &'static str {
        match self {
            ConstraintKind::IsType { .. } => "IsType",
            ConstraintKind::IsNumeric => "IsNumeric",
            ConstraintKind::IsInteger => "IsInteger",
            ConstraintKind::IsGreaterThan { .. } => "IsGreaterThan",
            ConstraintKind::IsPositiveInteger => "IsPositiveInteger",
            ConstraintKind::IsString => "IsString",
            ConstraintKind::IsBoolean => "IsBoolean",
            ConstraintKind::IsDate => "IsDate",
            ConstraintKind::IsDateTime => "IsDateTime",
            ConstraintKind::IsList => "IsList",
            ConstraintKind::IsRequired => "IsRequired",
            ConstraintKind::Selection { .. } => "SelectionConstraint",
        }
    }

    /// Evaluate the predicate against a non-null value.
    fn check(&self, value: &Value) -> Result<(), ConstraintError> {
        match self {
            ConstraintKind::IsType { data_type } => {
                if value.kind() == *data_type {
                    Ok(())
                } else {
                    Err(ConstraintError::for_kind(*data_type, value))
                }
            }
            ConstraintKind::IsNumeric => match value {
                Value::Int(_) | Value::Float(_) => Ok(()),
                _ => Err(ConstraintError::NumericValue {
                    value: value.clone(),
                }),
            },
            ConstraintKind::IsInteger => match value {
                Value::Int(_) => Ok(()),
                _ => Err(ConstraintError::IntegerValue {
                    value: value.clone(),
                }),
            },
            ConstraintKind::IsGreaterThan { min_value } => {
                ConstraintKind::IsNumeric.check(value)?;
                match value.as_f64() {
                    Some(number) if number > *min_value => Ok(()),
                    _ => Err(ConstraintError::NotGreaterThan {
                        value: value.clone(),
                        min_value: *min_value,
                    }),
                }
            }
            ConstraintKind::IsPositiveInteger => [
                ConstraintKind::IsInteger,
                ConstraintKind::IsGreaterThan { min_value: 0.0 },
            ]
            .iter()
            .try_for_each(|part| part.check(value)),
            ConstraintKind::IsString => match value {
                Value::String(_) => Ok(()),
                _ => Err(ConstraintError::StringValue {
                    value: value.clone(),
                }),
            },
            ConstraintKind::IsBoolean => match value.as_str() {
                Some("true") | Some("false") => Ok(()),
                _ => Err(ConstraintError::BooleanValue {
                    value: value.clone(),
                }),
            },
            ConstraintKind::IsDate => match value {
                Value::Date(_) => Ok(()),
                _ => Err(ConstraintError::DateValue {
                    value: value.clone(),
                }),
            },
            ConstraintKind::IsDateTime => match value {
                Value::DateTime(_) => Ok(()),
                _ => Err(ConstraintError::DateTimeValue {
                    value: value.clone(),
                }),
            },
            ConstraintKind::IsList => match value {
                Value::List(_) => Ok(()),
                _ => Err(ConstraintError::ListValue {
                    value: value.clone(),
                }),
            },
            ConstraintKind::IsRequired => Ok(()),
            ConstraintKind::Selection { options } => {
                let items = match value {
                    Value::List(items) => items.as_slice(),
                    scalar => std::slice::from_ref(scalar),
                };
                match items.iter().find(|item| !options.contains(item)) {
                    None => Ok(()),
                    Some(item) => Err(ConstraintError::SelectionValue {
                        value: item.clone(),
                        options: options.clone(),
                    }),
                }
            }
        }
    }
}

impl PartialEq for ConstraintKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ConstraintKind::IsType { data_type: a },
                ConstraintKind::IsType { data_type: b },
            ) => a == b,
            (
                ConstraintKind::IsGreaterThan { min_value: a },
                ConstraintKind::IsGreaterThan { min_value: b },
            ) => a.total_cmp(b).is_eq(),
            (
                ConstraintKind::Selection { options: a },
                ConstraintKind::Selection { options: b },
            ) => option_set(a) == option_set(b),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for ConstraintKind {}

impl Hash for ConstraintKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        match self {
            ConstraintKind::IsType { data_type } => data_type.hash(state),
            ConstraintKind::IsGreaterThan { min_value } => min_value.to_bits().hash(state),
            ConstraintKind::Selection { options } => {
                // Order-independent: sum the hashes of the distinct options.
                let set = option_set(options);
                let combined = set.iter().fold(0u64, |acc, option| {
                    let mut hasher = DefaultHasher::new();
                    option.hash(&mut hasher);
                    acc.wrapping_add(hasher.finish())
                });
                set.len().hash(state);
                combined.hash(state);
            }
            _ => {}
        }
    }
}

fn option_set(options: &[Value]) -> HashSet<&Value> {
    options.iter().collect()
}

/// A predicate over a single value with nullability semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    kind: ConstraintKind,
    nullable: bool,
}

impl Constraint {
    /// A nullable constraint of the given kind. `IsRequired` is never nullable.
    pub fn new(kind: ConstraintKind) -> Self {
        let nullable = !matches!(kind, ConstraintKind::IsRequired);
        Self { kind, nullable }
    }

    pub fn is_type(data_type: ValueKind) -> Self {
        Self::new(ConstraintKind::IsType { data_type })
    }

    pub fn is_numeric() -> Self {
        Self::new(ConstraintKind::IsNumeric)
    }

    pub fn is_integer() -> Self {
        Self::new(ConstraintKind::IsInteger)
    }

    pub fn is_greater_than(min_value: f64) -> Self {
        Self::new(ConstraintKind::IsGreaterThan { min_value })
    }

    pub fn is_positive_integer() -> Self {
        Self::new(ConstraintKind::IsPositiveInteger)
    }

    pub fn is_string() -> Self {
        Self::new(ConstraintKind::IsString)
    }

    pub fn is_boolean() -> Self {
        Self::new(ConstraintKind::IsBoolean)
    }

    pub fn is_date() -> Self {
        Self::new(ConstraintKind::IsDate)
    }

    pub fn is_date_time() -> Self {
        Self::new(ConstraintKind::IsDateTime)
    }

    pub fn is_list() -> Self {
        Self::new(ConstraintKind::IsList)
    }

    pub fn is_required() -> Self {
        Self::new(ConstraintKind::IsRequired)
    }

    pub fn selection<T: Into<Value>>(options: impl IntoIterator<Item = T>) -> Self {
        Self::new(ConstraintKind::Selection {
            options: options.into_iter().map(Into::into).collect(),
        })
    }

    /// Builder-style nullable override.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.set_nullable(nullable);
        self
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn set_nullable(&mut self, nullable: bool) {
        if !self.is_required_marker() {
            self.nullable = nullable;
        }
    }

    pub fn is_required_marker(&self) -> bool {
        matches!(self.kind, ConstraintKind::IsRequired)
    }

    pub fn min_value(&self) -> Option<f64> {
        match self.kind {
            ConstraintKind::IsGreaterThan { min_value } => Some(min_value),
            ConstraintKind::IsPositiveInteger => Some(0.0),
            _ => None,
        }
    }

    pub fn options(&self) -> Option<&[Value]> {
        match &self.kind {
            ConstraintKind::Selection { options } => Some(options),
            _ => None,
        }
    }

    /// Replace the options of a selection constraint. Returns `false` (and
    /// changes nothing) for any other kind.
    pub fn set_options(&mut self, new_options: Vec<Value>) -> bool {
        match &mut self.kind {
            ConstraintKind::Selection { options } => {
                *options = new_options;
                true
            }
            _ => false,
        }
    }

    /// Strict check: the first violated rule is returned as an error.
    pub fn validate(&self, value: &Value) -> Result<(), ConstraintError> {
        // An empty selection counts as no selection.
        let empty_selection = matches!(
            (&self.kind, value),
            (ConstraintKind::Selection { .. }, Value::List(items)) if items.is_empty()
        );
        if empty_selection || value.is_null() {
            return if self.nullable {
                Ok(())
            } else {
                Err(ConstraintError::NullField)
            };
        }
        self.kind.check(value)
    }

    /// Lenient check.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn hash_of(constraint: &Constraint) -> u64 {
        let mut hasher = DefaultHasher::new();
        constraint.hash(&mut hasher);
        hasher.finish()
    }

    fn today() -> Value {
        Value::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn now() -> Value {
        Value::DateTime(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap().fixed_offset())
    }

    fn all_kinds() -> Vec<Constraint> {
        vec![
            Constraint::is_numeric(),
            Constraint::is_integer(),
            Constraint::is_date(),
            Constraint::is_list(),
            Constraint::is_date_time(),
            Constraint::is_boolean(),
            Constraint::is_positive_integer(),
            Constraint::is_string(),
            Constraint::is_greater_than(0.0),
        ]
    }

    #[test]
    fn equality_and_hash_follow_kind_and_nullable() {
        let kinds = all_kinds();
        for (i, a) in kinds.iter().enumerate() {
            for (j, b) in kinds.iter().enumerate() {
                for na in [true, false] {
                    for nb in [true, false] {
                        let a = a.clone().with_nullable(na);
                        let b = b.clone().with_nullable(nb);
                        if i == j && na == nb {
                            assert_eq!(a, b);
                            assert_eq!(hash_of(&a), hash_of(&b));
                        } else {
                            assert_ne!(a, b);
                            assert_ne!(hash_of(&a), hash_of(&b));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn null_passes_nullable_and_fails_otherwise() {
        let mut constraint = Constraint::is_type(ValueKind::Map);
        assert!(constraint.nullable());
        assert!(constraint.is_valid(&Value::Null));
        assert!(constraint.validate(&Value::Null).is_ok());

        constraint.set_nullable(false);
        assert!(!constraint.is_valid(&Value::Null));
        assert_eq!(
            constraint.validate(&Value::Null),
            Err(ConstraintError::NullField)
        );
    }

    #[test]
    fn is_type_reports_the_kind_specific_error() {
        let constraint = Constraint::is_type(ValueKind::String);
        assert!(constraint.is_valid(&Value::from("x")));
        assert!(matches!(
            constraint.validate(&Value::from(1)),
            Err(ConstraintError::StringValue { .. })
        ));
        assert_ne!(constraint, Constraint::is_type(ValueKind::Int));
    }

    #[test]
    fn numeric_excludes_booleans() {
        let constraint = Constraint::is_numeric();
        assert!(constraint.is_valid(&Value::from(1)));
        assert!(constraint.is_valid(&Value::from(5.2)));
        assert!(constraint.is_valid(&Value::from(-1.2)));
        assert!(!constraint.is_valid(&Value::from("-1.2")));
        assert!(!constraint.is_valid(&Value::from(true)));
        assert!(matches!(
            constraint.validate(&Value::from(false)),
            Err(ConstraintError::NumericValue { .. })
        ));
    }

    #[test]
    fn integer_rejects_floats_strings_and_booleans() {
        let constraint = Constraint::is_integer();
        assert!(constraint.is_valid(&Value::from(0)));
        assert!(constraint.is_valid(&Value::from(-3)));
        for bad in [
            Value::from("1.2"),
            Value::from(5.7),
            Value::List(vec![]),
            Value::from(false),
        ] {
            assert!(!constraint.is_valid(&bad));
            assert!(matches!(
                constraint.validate(&bad),
                Err(ConstraintError::IntegerValue { .. })
            ));
        }
    }

    #[test]
    fn positive_integer_checks_type_before_floor() {
        let constraint = Constraint::is_positive_integer();
        assert!(constraint.is_valid(&Value::from(1)));
        assert!(constraint.is_valid(&Value::from(5)));
        assert!(!constraint.is_valid(&Value::from(0)));
        assert!(!constraint.is_valid(&Value::from(-5)));
        assert!(!constraint.is_valid(&Value::from(3.3)));

        assert!(matches!(
            constraint.validate(&Value::from(0)),
            Err(ConstraintError::NotGreaterThan { .. })
        ));
        assert!(matches!(
            constraint.validate(&Value::from(-1)),
            Err(ConstraintError::NotGreaterThan { .. })
        ));
        assert!(matches!(
            constraint.validate(&Value::from(1.2)),
            Err(ConstraintError::IntegerValue { .. })
        ));
        assert!(matches!(
            constraint.validate(&Value::from("1")),
            Err(ConstraintError::IntegerValue { .. })
        ));
        assert!(matches!(
            constraint.validate(&Value::from(false)),
            Err(ConstraintError::IntegerValue { .. })
        ));
        assert!(matches!(
            constraint.validate(&Value::Map(Default::default())),
            Err(ConstraintError::IntegerValue { .. })
        ));
    }

    #[test]
    fn greater_than_uses_its_floor() {
        let floor_zero = Constraint::is_greater_than(0.0);
        let floor_neg = Constraint::is_greater_than(-6.0);
        assert!(floor_zero.is_valid(&Value::from(1)));
        assert!(floor_neg.is_valid(&Value::from(0)));
        assert!(!floor_neg.is_valid(&Value::from(-6)));
        assert!(!floor_zero.is_valid(&Value::from(true)));
        assert!(matches!(
            floor_zero.validate(&Value::from("Hello")),
            Err(ConstraintError::NumericValue { .. })
        ));
        assert!(matches!(
            floor_zero.validate(&Value::from(0)),
            Err(ConstraintError::NotGreaterThan { .. })
        ));
        assert_eq!(floor_neg, Constraint::is_greater_than(-6.0));
        assert_ne!(floor_zero, floor_neg);
        assert_ne!(hash_of(&floor_zero), hash_of(&floor_neg));
    }

    #[test]
    fn string_constraint() {
        let constraint = Constraint::is_string();
        assert!(constraint.is_valid(&Value::from("")));
        assert!(constraint.is_valid(&Value::from("1")));
        assert!(matches!(
            constraint.validate(&Value::from(1.2)),
            Err(ConstraintError::StringValue { .. })
        ));
    }

    #[test]
    fn boolean_accepts_wire_strings_only() {
        let constraint = Constraint::is_boolean();
        assert!(constraint.is_valid(&Value::from("true")));
        assert!(constraint.is_valid(&Value::from("false")));
        assert!(!constraint.is_valid(&Value::from(true)));
        assert!(!constraint.is_valid(&Value::from("1")));
        assert!(!constraint.is_valid(&Value::from(1)));
        assert!(matches!(
            constraint.validate(&Value::from(false)),
            Err(ConstraintError::BooleanValue { .. })
        ));
    }

    #[test]
    fn date_and_datetime_are_disjoint() {
        let date = Constraint::is_date();
        let datetime = Constraint::is_date_time();
        assert!(date.is_valid(&today()));
        assert!(!date.is_valid(&now()));
        assert!(datetime.is_valid(&now()));
        assert!(!datetime.is_valid(&today()));
        assert!(matches!(
            date.validate(&now()),
            Err(ConstraintError::DateValue { .. })
        ));
        assert!(matches!(
            datetime.validate(&today()),
            Err(ConstraintError::DateTimeValue { .. })
        ));
        assert!(matches!(
            date.validate(&Value::from("2024-05-01")),
            Err(ConstraintError::DateValue { .. })
        ));
    }

    #[test]
    fn list_constraint() {
        let constraint = Constraint::is_list();
        assert!(constraint.is_valid(&Value::List(vec![])));
        assert!(constraint.is_valid(&Value::from(vec![1, 2, 3])));
        assert!(matches!(
            constraint.validate(&Value::Map(Default::default())),
            Err(ConstraintError::ListValue { .. })
        ));
    }

    #[test]
    fn required_is_never_nullable() {
        let mut constraint = Constraint::is_required();
        constraint.set_nullable(true);
        assert!(!constraint.nullable());
        assert!(constraint.is_valid(&Value::from(0)));
        assert_eq!(
            constraint.validate(&Value::Null),
            Err(ConstraintError::NullField)
        );
    }

    fn mixed_options() -> Constraint {
        Constraint::selection([
            Value::from("hello"),
            Value::from(0),
            Value::from(true),
            Value::from(3.3),
        ])
    }

    #[test]
    fn selection_requires_exact_type_match() {
        let constraint = mixed_options();
        assert!(constraint.is_valid(&Value::from("hello")));
        assert!(constraint.is_valid(&Value::from(0)));
        assert!(constraint.is_valid(&Value::from(true)));
        assert!(constraint.is_valid(&Value::from(3.3)));
        assert!(!constraint.is_valid(&Value::from("world")));
        assert!(!constraint.is_valid(&Value::from(1)));
        assert!(!constraint.is_valid(&Value::from(false)));
        assert!(!constraint.is_valid(&Value::from(3.2)));
        assert!(matches!(
            constraint.validate(&Value::from(1)),
            Err(ConstraintError::SelectionValue { .. })
        ));
    }

    #[test]
    fn selection_checks_every_list_element() {
        let constraint = mixed_options();
        assert!(constraint.is_valid(&Value::List(vec![
            Value::from(0),
            Value::from(3.3),
            Value::from("hello"),
        ])));
        let err = constraint
            .validate(&Value::List(vec![Value::from(true), Value::from("world")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConstraintError::SelectionValue {
                value: Value::from("world"),
                options: mixed_options().options().unwrap().to_vec(),
            }
        );
    }

    #[test]
    fn empty_selection_is_treated_as_null() {
        let constraint = mixed_options().with_nullable(false);
        assert!(!constraint.is_valid(&Value::Null));
        assert_eq!(
            constraint.validate(&Value::List(vec![])),
            Err(ConstraintError::NullField)
        );
    }

    #[test]
    fn selection_equality_ignores_order_and_duplicates() {
        let c1 = Constraint::selection(["hello", "world"]);
        let c2 = Constraint::selection(["hello", "goodbye", "now", "world"]);
        let c3 = Constraint::selection(Vec::<&str>::new());
        let c4 = Constraint::selection(["world", "hello"]);
        let c5 = Constraint::selection(["hello", "world", "world"]);
        assert_eq!(c1, c4);
        assert_eq!(c1, c5);
        assert_eq!(hash_of(&c1), hash_of(&c4));
        assert_eq!(hash_of(&c1), hash_of(&c5));
        assert_ne!(c1, c2);
        assert_ne!(c2, c3);
        assert_ne!(hash_of(&c1), hash_of(&c2));

        let c1 = c1.with_nullable(false);
        assert_ne!(c1, c4);
        assert_ne!(hash_of(&c1), hash_of(&c4));
    }

    #[test]
    fn set_options_changes_behavior() {
        let mut constraint = Constraint::selection(["short", "long"]);
        assert!(!constraint.is_valid(&Value::from("medium")));
        assert!(constraint.set_options(vec![Value::from("medium")]));
        assert!(constraint.is_valid(&Value::from("medium")));
        assert!(!Constraint::is_string().set_options(vec![]));
    }
}
