//! Request shape of an entry point.

use crate::api::EndpointBehavior;
use crate::fields::{FieldNames, InterfaceField, InterfaceFieldSet, IntoFieldList};
use crate::http::HttpMethod;
use crate::validation::InterfaceValidationError;
use crate::value::Map;

/// HTTP method, behavior and the header and parameter definitions a request
/// must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    method: HttpMethod,
    behavior: EndpointBehavior,
    headers: InterfaceFieldSet,
    parameters: InterfaceFieldSet,
}

impl Interface {
    pub fn new(method: HttpMethod, behavior: EndpointBehavior) -> Self {
        Self {
            method,
            behavior,
            headers: InterfaceFieldSet::default(),
            parameters: InterfaceFieldSet::default(),
        }
    }

    pub fn with_headers(mut self, headers: impl IntoFieldList<InterfaceField>) -> Self {
        self.headers.add(headers);
        self
    }

    pub fn with_parameters(mut self, parameters: impl IntoFieldList<InterfaceField>) -> Self {
        self.parameters.add(parameters);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn behavior(&self) -> EndpointBehavior {
        self.behavior
    }

    pub fn headers(&self) -> &InterfaceFieldSet {
        &self.headers
    }

    pub fn parameters(&self) -> &InterfaceFieldSet {
        &self.parameters
    }

    pub fn add_headers(&mut self, headers: impl IntoFieldList<InterfaceField>) {
        self.headers.add(headers);
    }

    pub fn remove_headers<K: FieldNames + ?Sized>(&mut self, headers: &K) {
        self.headers.remove(headers);
    }

    pub fn add_parameters(&mut self, parameters: impl IntoFieldList<InterfaceField>) {
        self.parameters.add(parameters);
    }

    pub fn remove_parameters<K: FieldNames + ?Sized>(&mut self, parameters: &K) {
        self.parameters.remove(parameters);
    }

    /// Validate both binding maps, returning the sanitized `(headers,
    /// parameters)` to send. Headers are checked first.
    pub fn validate(
        &self,
        headers: &Map,
        parameters: &Map,
    ) -> Result<(Map, Map), InterfaceValidationError> {
        let headers = self.headers.validate(headers)?;
        let parameters = self.parameters.validate(parameters)?;
        Ok((headers, parameters))
    }
}
