//! Value constraints and the validators that combine them.

pub mod constraint;
pub mod error;
pub mod validator;

pub use constraint::{Constraint, ConstraintKind};
pub use error::{ConstraintError, InterfaceValidationError};
pub use validator::Validator;
