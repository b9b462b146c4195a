//! Entry points and the registry that routes to them.

use std::collections::HashMap;

use tracing::debug;

use crate::api::{EndpointBehavior, Interface, ModelType, Route};
use crate::error::ApiError;

/// A named, routable operation of the API.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPoint {
    name: String,
    route: Route,
    interface: Interface,
}

impl EntryPoint {
    pub fn new(name: impl Into<String>, route: Route, interface: Interface) -> Self {
        Self {
            name: name.into(),
            route,
            interface,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    pub fn model_type(&self) -> ModelType {
        self.route.model_type()
    }

    pub fn behavior(&self) -> EndpointBehavior {
        self.interface.behavior()
    }

    fn key(&self) -> (ModelType, EndpointBehavior) {
        (self.model_type(), self.behavior())
    }
}

/// Entry points keyed by `(model type, behavior)`. At most one entry point
/// may serve each key.
#[derive(Debug, Clone, Default)]
pub struct Api {
    entry_points: HashMap<(ModelType, EndpointBehavior), EntryPoint>,
}

impl Api {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entry_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_points.is_empty()
    }

    pub fn entry_points(&self) -> impl Iterator<Item = &EntryPoint> {
        self.entry_points.values()
    }

    pub fn register(&mut self, entry_point: EntryPoint) -> Result<(), ApiError> {
        let key = entry_point.key();
        if let Some(existing) = self.entry_points.get(&key) {
            return Err(ApiError::DuplicateEntryPoint {
                model: key.0,
                behavior: key.1,
                path: existing.route().path(),
            });
        }
        debug!(name = entry_point.name(), model = %key.0, behavior = %key.1, "registered entry point");
        self.entry_points.insert(key, entry_point);
        Ok(())
    }

    pub fn register_all(
        &mut self,
        entry_points: impl IntoIterator<Item = EntryPoint>,
    ) -> Result<(), ApiError> {
        entry_points
            .into_iter()
            .try_for_each(|entry_point| self.register(entry_point))
    }

    /// Remove and return the entry point serving `(model, behavior)`.
    pub fn unregister(
        &mut self,
        model: ModelType,
        behavior: EndpointBehavior,
    ) -> Option<EntryPoint> {
        self.entry_points.remove(&(model, behavior))
    }

    pub fn clear(&mut self) {
        self.entry_points.clear();
    }

    pub fn route(
        &self,
        model: ModelType,
        behavior: EndpointBehavior,
    ) -> Result<&EntryPoint, ApiError> {
        self.entry_points
            .get(&(model, behavior))
            .ok_or(ApiError::EntrypointNotFound { model, behavior })
    }
}

/// Later entry points replace earlier ones serving the same key.
impl FromIterator<EntryPoint> for Api {
    fn from_iter<I: IntoIterator<Item = EntryPoint>>(iter: I) -> Self {
        Self {
            entry_points: iter
                .into_iter()
                .map(|entry_point| (entry_point.key(), entry_point))
                .collect(),
        }
    }
}
