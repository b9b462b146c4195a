//! URL path templates.
//!
//! # Design
//! A `Route` is an ordered list of `RouteComponent`s plus a suffix. Components
//! may contain `{{ name }}` placeholders which `apply` substitutes at request
//! time. Two routes are equal when they serve the same model and render the
//! same template path.

use std::borrow::Cow;
use std::fmt;

use crate::api::ModelType;
use crate::error::ApiError;

/// A single path segment (or `/`-joined run of segments), stored without
/// leading or trailing separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteComponent(Cow<'static, str>);

impl RouteComponent {
    pub const API_V1: RouteComponent = RouteComponent(Cow::Borrowed("api/v1"));
    pub const MODEL_NAME: RouteComponent = RouteComponent(Cow::Borrowed("{{ model_name }}"));
    pub const OBJECT_ID: RouteComponent = RouteComponent(Cow::Borrowed("{{ object_id }}"));
    pub const ACCEPT_APPLICATION: RouteComponent =
        RouteComponent(Cow::Borrowed("accept_application"));
    pub const BY_DATE: RouteComponent = RouteComponent(Cow::Borrowed("by_date"));

    pub fn new(sub_path: impl Into<String>) -> Result<Self, ApiError> {
        let sub_path = sub_path.into();
        let trimmed = sub_path.trim_matches(|c| c == '/' || c == '\\');
        if trimmed.is_empty() {
            return Err(ApiError::InvalidRequest(format!(
                "route component `{sub_path}` is empty"
            )));
        }
        Ok(Self(Cow::Owned(trimmed.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    model_type: ModelType,
    components: Vec<RouteComponent>,
    suffix: String,
}

impl Route {
    pub const DEFAULT_SUFFIX: &'static str = ".json";

    pub fn new(model_type: ModelType, components: impl IntoIterator<Item = RouteComponent>) -> Self {
        Self {
            model_type,
            components: components.into_iter().collect(),
            suffix: Self::DEFAULT_SUFFIX.to_string(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn components(&self) -> &[RouteComponent] {
        &self.components
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn add(&mut self, component: RouteComponent) {
        self.components.push(component);
    }

    /// Remove every occurrence of `component`. Returns whether any was found.
    pub fn remove(&mut self, component: &RouteComponent) -> bool {
        let before = self.components.len();
        self.components.retain(|existing| existing != component);
        self.components.len() != before
    }

    /// The template path, placeholders included.
    pub fn path(&self) -> String {
        let joined = self
            .components
            .iter()
            .map(RouteComponent::as_str)
            .collect::<Vec<_>>()
            .join("/");
        format!("{joined}{}", self.suffix)
    }

    /// Render the path with each `{{ name }}` replaced by its value.
    /// Placeholders without a value are left untouched.
    pub fn apply<K, V>(&self, vars: impl IntoIterator<Item = (K, V)>) -> String
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        vars.into_iter().fold(self.path(), |path, (name, value)| {
            path.replace(&format!("{{{{ {} }}}}", name.as_ref()), value.as_ref())
        })
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.model_type == other.model_type && self.path() == other.path()
    }
}

impl Eq for Route {}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_route() -> Route {
        Route::new(
            ModelType::Children,
            [
                RouteComponent::API_V1,
                RouteComponent::MODEL_NAME,
                RouteComponent::OBJECT_ID,
            ],
        )
    }

    #[test]
    fn components_are_trimmed() {
        let component = RouteComponent::new("/by_date\\").unwrap();
        assert_eq!(component, RouteComponent::BY_DATE);
        assert_eq!(RouteComponent::new("/api/v1/").unwrap().as_str(), "api/v1");
    }

    #[test]
    fn empty_components_are_rejected() {
        assert!(matches!(
            RouteComponent::new("//"),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(RouteComponent::new("").is_err());
    }

    #[test]
    fn path_joins_components_with_suffix() {
        assert_eq!(
            show_route().path(),
            "api/v1/{{ model_name }}/{{ object_id }}.json"
        );
        assert_eq!(
            show_route().with_suffix("").path(),
            "api/v1/{{ model_name }}/{{ object_id }}"
        );
    }

    #[test]
    fn apply_substitutes_placeholders() {
        let route = show_route();
        assert_eq!(
            route.apply([("model_name", "children"), ("object_id", "12")]),
            "api/v1/children/12.json"
        );
        assert_eq!(
            route.apply([("model_name", "children")]),
            "api/v1/children/{{ object_id }}.json"
        );
    }

    #[test]
    fn add_and_remove_components() {
        let mut route = show_route();
        route.add(RouteComponent::ACCEPT_APPLICATION);
        assert_eq!(
            route.path(),
            "api/v1/{{ model_name }}/{{ object_id }}/accept_application.json"
        );
        assert!(route.remove(&RouteComponent::ACCEPT_APPLICATION));
        assert!(!route.remove(&RouteComponent::BY_DATE));
        assert_eq!(route, show_route());
    }

    #[test]
    fn equality_compares_model_and_path() {
        let mut other = show_route();
        assert_eq!(other, show_route());
        other.model_type = ModelType::Users;
        assert_ne!(other, show_route());
    }
}
