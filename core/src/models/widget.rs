//! Open-schema form records.
//!
//! # Design
//! Form templates define their own questions, so a widget's attributes are
//! not known at compile time. A `Widget` is an ordered name-to-value bag;
//! every key is accepted on assignment and returned by `to_dict`.

use crate::models::{Attribute, JsonModel, ModelError};
use crate::value::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Widget {
    attributes: Map,
}

impl Widget {
    pub fn new(attributes: Map) -> Self {
        Self { attributes }
    }

    /// A `{name, value}` answer record.
    pub fn answer(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut attributes = Map::new();
        attributes.insert("name".to_string(), Value::String(name.into()));
        attributes.insert("value".to_string(), value.into());
        Self { attributes }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.shift_remove(key)
    }

    pub fn attributes(&self) -> &Map {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl JsonModel for Widget {
    fn to_dict(&self) -> Map {
        self.attributes.clone()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<bool, ModelError> {
        self.attributes.insert(key.to_string(), value);
        Ok(true)
    }

    fn from_dict(data: Map) -> Result<Self, ModelError> {
        Ok(Self::new(data))
    }
}

impl Attribute for Widget {
    fn to_value(&self) -> Value {
        Value::Map(self.attributes.clone())
    }

    fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Map(map) => Ok(Self::new(map)),
            other => Err(ModelError::unexpected("Widget", other)),
        }
    }
}
