//! Fields, interface fields and the sets that hold them.

mod field;
mod interface;
mod set;

pub use field::{Field, FieldKind};
pub use interface::InterfaceField;
pub use set::{FieldNames, FieldRef, FieldSet, InterfaceFieldSet, IntoFieldList};

/// Anything stored in a `FieldSet` under a name.
pub trait Named {
    fn name(&self) -> &str;
}
