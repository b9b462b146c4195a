//! Domain models and the dictionary mapper.
//!
//! # Design
//! Every model declares its attributes once, through `json_model!`, as a list
//! of `(rust field, type, wire key)` triples. The macro derives the struct
//! and its `JsonModel` impl from that list, so conversion needs no runtime
//! reflection:
//!
//! - `to_dict` walks the declared attributes, turning nested models into maps.
//! - `set` assigns one attribute by wire key, coercing through `Attribute`.
//! - `from_dict` starts from `Default` and calls `set` for every key; keys
//!   that are not attributes are skipped, so new server fields never break
//!   older clients.
//! - `to_json` runs `Formatter::jsonify` over `to_dict`.

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::trace;

use crate::value::{Map, Value};

pub mod error;
pub mod formatter;

pub use error::{FormatError, ModelError};
pub use formatter::Formatter;

/// A typed slot that converts to and from an untyped `Value`.
pub trait Attribute: Sized {
    fn to_value(&self) -> Value;
    fn from_value(value: Value) -> Result<Self, ModelError>;
}

/// Conversion between a typed record and its dictionary form.
pub trait JsonModel: Default {
    fn to_dict(&self) -> Map;

    /// Assign the attribute stored under `key`. Returns `Ok(false)` when the
    /// model has no such attribute.
    fn set(&mut self, key: &str, value: Value) -> Result<bool, ModelError>;

    fn from_dict(data: Map) -> Result<Self, ModelError> {
        let mut instance = Self::default();
        for (key, value) in data {
            if !instance.set(&key, value)? {
                trace!(
                    model = std::any::type_name::<Self>(),
                    attribute = key.as_str(),
                    "ignoring unknown attribute"
                );
            }
        }
        Ok(instance)
    }

    fn to_json(&self) -> serde_json::Value {
        Formatter::jsonify(&self.to_dict())
    }
}

/// A record with a server-assigned identity.
pub trait Model: JsonModel {
    fn id(&self) -> Option<i64>;
}

impl Attribute for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        Ok(value)
    }
}

impl Attribute for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        value
            .as_i64()
            .ok_or_else(|| ModelError::unexpected("int", value))
    }
}

impl Attribute for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        value
            .as_f64()
            .ok_or_else(|| ModelError::unexpected("number", value))
    }
}

impl Attribute for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ModelError::unexpected("str", other)),
        }
    }
}

/// Native booleans and the wire strings `"true"` / `"false"`.
impl Attribute for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::String(ref s) if s == "true" => Ok(true),
            Value::String(ref s) if s == "false" => Ok(false),
            other => Err(ModelError::unexpected("bool", other)),
        }
    }
}

impl Attribute for NaiveDate {
    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        Ok(Formatter::str_to_date(&value)?)
    }
}

impl Attribute for DateTime<FixedOffset> {
    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        Ok(Formatter::str_to_datetime(&value)?)
    }
}

impl Attribute for Map {
    fn to_value(&self) -> Value {
        Value::Map(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Map(map) => Ok(map),
            other => Err(ModelError::unexpected("dict", other)),
        }
    }
}

impl<T: Attribute> Attribute for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Attribute::to_value)
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Null reads as an empty list and a scalar as a one-element list.
impl<T: Attribute> Attribute for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Attribute::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            scalar => T::from_value(scalar).map(|item| vec![item]),
        }
    }
}

/// Declare a model struct together with its `JsonModel` and `Attribute`
/// impls. Each attribute is written `field: Type => "wire_key"`.
macro_rules! json_model {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty => $key:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl $name {
            /// Wire keys of every declared attribute, in declaration order.
            pub const ATTRIBUTES: &'static [&'static str] = &[$($key),*];
        }

        impl $crate::models::JsonModel for $name {
            fn to_dict(&self) -> $crate::value::Map {
                let mut data = $crate::value::Map::new();
                $(
                    data.insert(
                        $key.to_string(),
                        $crate::models::Attribute::to_value(&self.$field),
                    );
                )*
                data
            }

            fn set(
                &mut self,
                key: &str,
                value: $crate::value::Value,
            ) -> Result<bool, $crate::models::ModelError> {
                match key {
                    $(
                        $key => {
                            self.$field = $crate::models::Attribute::from_value(value)
                                .map_err(|err| $crate::models::ModelError::attribute($key, err))?;
                            Ok(true)
                        }
                    )*
                    _ => Ok(false),
                }
            }
        }

        impl $crate::models::Attribute for $name {
            fn to_value(&self) -> $crate::value::Value {
                $crate::value::Value::Map($crate::models::JsonModel::to_dict(self))
            }

            fn from_value(
                value: $crate::value::Value,
            ) -> Result<Self, $crate::models::ModelError> {
                match value {
                    $crate::value::Value::Map(map) => {
                        <Self as $crate::models::JsonModel>::from_dict(map)
                    }
                    other => Err($crate::models::ModelError::unexpected(
                        stringify!($name),
                        other,
                    )),
                }
            }
        }
    };
}

mod records;
mod widget;

pub use records::{
    Activity, Area, Auth, Child, Classroom, ConferenceReport, Event, Form, FormTemplate, Group,
    Lesson, LessonSet, Level, OnlineApplication, Scale, School, Session, User,
};
pub use widget::Widget;
