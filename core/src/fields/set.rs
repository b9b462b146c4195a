//! Keyed collections of fields.
//!
//! # Design
//! `FieldSet<T>` is a small insertion-ordered map from name to item backed by
//! a `Vec`. Parameter lists are short, so a linear scan beats hashing and
//! keeps iteration order stable. What can be added is described by
//! `IntoFieldList`; what can be removed is described by `FieldNames`, so a
//! single `remove` call accepts names, fields, mixed lists and whole sets.

use tracing::trace;

use crate::fields::{Field, InterfaceField, Named};
use crate::validation::InterfaceValidationError;
use crate::value::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet<T> {
    fields: Vec<T>,
}

/// Interface field definitions keyed by their suffixed names.
pub type InterfaceFieldSet = FieldSet<InterfaceField>;

impl<T> Default for FieldSet<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T: Named + Clone> FieldSet<T> {
    pub fn new(fields: impl IntoFieldList<T>) -> Self {
        let mut set = Self::default();
        set.add(fields);
        set
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The item stored under `name`, or `None`.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.fields.iter()
    }

    /// Insert items; an item whose name is already present replaces the
    /// stored one in place.
    pub fn add(&mut self, fields: impl IntoFieldList<T>) {
        for field in fields.into_field_list() {
            match self.fields.iter_mut().find(|existing| existing.name() == field.name()) {
                Some(existing) => *existing = field,
                None => self.fields.push(field),
            }
        }
    }

    /// Remove every item named by `fields`. Absent names are ignored.
    pub fn remove<K: FieldNames + ?Sized>(&mut self, fields: &K) {
        let mut names = Vec::new();
        fields.collect_names(&mut names);
        self.fields
            .retain(|field| !names.iter().any(|name| *name == field.name()));
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Independent copies of the stored items.
    pub fn to_list(&self) -> Vec<T> {
        self.fields.clone()
    }
}

impl FieldSet<Field> {
    /// `{name: value}` for every field.
    pub fn to_json(&self) -> Map {
        self.fields
            .iter()
            .map(|field| (field.name().to_string(), field.value().clone()))
            .collect()
    }
}

impl FieldSet<InterfaceField> {
    /// Strictly validate `bindings` against every definition.
    ///
    /// Bindings are looked up by base name; a missing binding is treated as
    /// null. Only non-null values make it into the returned map.
    pub fn validate(&self, bindings: &Map) -> Result<Map, InterfaceValidationError> {
        let mut validated = Map::new();
        for field in &self.fields {
            let key = field.base_name();
            let value = bindings.get(key).cloned().unwrap_or(Value::Null);
            field
                .validate(&value)
                .map_err(|source| InterfaceValidationError::new(key, value.clone(), source))?;
            if value.is_null() {
                trace!(field = key, "dropping unset optional binding");
            } else {
                validated.insert(key.to_string(), value);
            }
        }
        Ok(validated)
    }
}

impl<T: Named + Clone> FromIterator<T> for FieldSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a FieldSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Things that can be added to a `FieldSet<T>`.
pub trait IntoFieldList<T> {
    fn into_field_list(self) -> Vec<T>;
}

impl IntoFieldList<Field> for Field {
    fn into_field_list(self) -> Vec<Field> {
        vec![self]
    }
}

impl IntoFieldList<InterfaceField> for InterfaceField {
    fn into_field_list(self) -> Vec<InterfaceField> {
        vec![self]
    }
}

impl<T> IntoFieldList<T> for Vec<T> {
    fn into_field_list(self) -> Vec<T> {
        self
    }
}

impl<T, const N: usize> IntoFieldList<T> for [T; N] {
    fn into_field_list(self) -> Vec<T> {
        self.into()
    }
}

impl<T: Clone> IntoFieldList<T> for &[T] {
    fn into_field_list(self) -> Vec<T> {
        self.to_vec()
    }
}

impl<T> IntoFieldList<T> for FieldSet<T> {
    fn into_field_list(self) -> Vec<T> {
        self.fields
    }
}

impl<T: Clone> IntoFieldList<T> for &FieldSet<T> {
    fn into_field_list(self) -> Vec<T> {
        self.fields.clone()
    }
}

/// Things that name set members for removal.
pub trait FieldNames {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>);
}

/// A bare name or a named attribute, for mixed removal lists.
#[derive(Clone, Copy)]
pub enum FieldRef<'a> {
    Name(&'a str),
    Attribute(&'a dyn Named),
}

impl<'a> From<&'a str> for FieldRef<'a> {
    fn from(name: &'a str) -> Self {
        FieldRef::Name(name)
    }
}

impl<'a> From<&'a Field> for FieldRef<'a> {
    fn from(field: &'a Field) -> Self {
        FieldRef::Attribute(field)
    }
}

impl<'a> From<&'a InterfaceField> for FieldRef<'a> {
    fn from(field: &'a InterfaceField) -> Self {
        FieldRef::Attribute(field)
    }
}

impl FieldNames for FieldRef<'_> {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            FieldRef::Name(name) => names.push(*name),
            FieldRef::Attribute(attribute) => names.push(attribute.name()),
        }
    }
}

impl FieldNames for str {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.push(self);
    }
}

impl FieldNames for String {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.push(self);
    }
}

impl FieldNames for Field {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.push(self.name());
    }
}

impl FieldNames for InterfaceField {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.push(self.name());
    }
}

impl<K: FieldNames + ?Sized> FieldNames for &K {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        (**self).collect_names(names);
    }
}

impl<K: FieldNames> FieldNames for [K] {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        for item in self {
            item.collect_names(names);
        }
    }
}

impl<K: FieldNames, const N: usize> FieldNames for [K; N] {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        self.as_slice().collect_names(names);
    }
}

impl<K: FieldNames> FieldNames for Vec<K> {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        self.as_slice().collect_names(names);
    }
}

impl<T: Named> FieldNames for FieldSet<T> {
    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.extend(self.fields.iter().map(Named::name));
    }
}
