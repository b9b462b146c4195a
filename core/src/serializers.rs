//! Outbound model serialization.
//!
//! # Design
//! A `Serializer<M>` is a static mapping from model attribute keys to output
//! locations. A location is a single key or a path of keys; paths create
//! intermediate objects as needed. Only non-null attribute values are
//! written, so the output carries exactly what the caller set.
//!
//! `serialize_dict` keeps typed values (dates stay dates) for interface
//! validation; `serialize` is its JSON rendering.

use std::marker::PhantomData;

use serde_json::Value as Json;

use crate::models::{Child, Formatter, JsonModel, OnlineApplication};
use crate::value::{Map, Value};

/// Where a serialized value lands in the output object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPath {
    Key(String),
    Path(Vec<String>),
}

impl KeyPath {
    fn segments(&self) -> &[String] {
        match self {
            KeyPath::Key(key) => std::slice::from_ref(key),
            KeyPath::Path(path) => path,
        }
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        KeyPath::Key(key.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(path: [&str; N]) -> Self {
        KeyPath::Path(path.iter().map(|segment| segment.to_string()).collect())
    }
}

#[derive(Debug, Clone)]
pub struct Serializer<M> {
    mapping: Vec<(String, KeyPath)>,
    model: PhantomData<fn(&M)>,
}

pub type ChildSerializer = Serializer<Child>;
pub type OnlineApplicationSerializer = Serializer<OnlineApplication>;

impl<M: JsonModel> Serializer<M> {
    pub fn new<K, P>(mapping: impl IntoIterator<Item = (K, P)>) -> Self
    where
        K: Into<String>,
        P: Into<KeyPath>,
    {
        Self {
            mapping: mapping
                .into_iter()
                .map(|(key, path)| (key.into(), path.into()))
                .collect(),
            model: PhantomData,
        }
    }

    pub fn mapping(&self) -> &[(String, KeyPath)] {
        &self.mapping
    }

    /// The mapped, non-null attributes of `obj` as typed values.
    pub fn serialize_dict(&self, obj: &M) -> Map {
        let data = obj.to_dict();
        let mut serialized = Map::new();
        for (object_key, destination) in &self.mapping {
            match data.get(object_key) {
                Some(Value::Null) | None => {}
                Some(value) => place(&mut serialized, destination.segments(), value.clone()),
            }
        }
        serialized
    }

    pub fn serialize(&self, obj: &M) -> serde_json::Map<String, Json> {
        self.serialize_dict(obj)
            .iter()
            .map(|(key, value)| (key.clone(), Formatter::jsonify_value(value)))
            .collect()
    }

    pub fn batch(&self, objs: &[M]) -> Vec<serde_json::Map<String, Json>> {
        objs.iter().map(|obj| self.serialize(obj)).collect()
    }
}

/// Write `value` at `path`, creating (or replacing non-map) intermediate
/// entries with maps.
fn place(target: &mut Map, path: &[String], value: Value) {
    match path {
        [] => {}
        [key] => {
            target.insert(key.clone(), value);
        }
        [head, rest @ ..] => {
            let entry = target
                .entry(head.clone())
                .or_insert_with(|| Value::Map(Map::new()));
            if !matches!(entry, Value::Map(_)) {
                *entry = Value::Map(Map::new());
            }
            if let Value::Map(inner) = entry {
                place(inner, rest, value);
            }
        }
    }
}

impl Default for Serializer<Child> {
    fn default() -> Self {
        Self::new(
            [
                "first_name",
                "last_name",
                "birth_date",
                "gender",
                "program",
                "ethnicity",
                "household_income",
                "dominant_language",
                "grade",
                "student_id",
                "hours_string",
                "allergies",
                "notes",
                "approved_adults_string",
                "emergency_contacts_string",
            ]
            .map(|key| (key, key)),
        )
    }
}

impl Default for Serializer<OnlineApplication> {
    fn default() -> Self {
        Self::new(["id", "school_id", "type", "state", "fields"].map(|key| (key, key)))
    }
}
