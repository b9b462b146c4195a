//! Error types for the Transparent Classroom client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the record does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging. Validation and model failures from the
//! lower layers pass through unchanged.

use thiserror::Error;

use crate::api::{EndpointBehavior, ModelType};
use crate::models::ModelError;
use crate::validation::InterfaceValidationError;

/// Errors returned by the client, the entry-point registry and routes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one and 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body was not the JSON shape the operation expects.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error("`{behavior}: {model}` Entrypoint Not Found in API.")]
    EntrypointNotFound {
        model: ModelType,
        behavior: EndpointBehavior,
    },

    #[error("A route has already been assigned to {model} -> {behavior}: {path}.")]
    DuplicateEntryPoint {
        model: ModelType,
        behavior: EndpointBehavior,
        path: String,
    },

    /// An authenticated request was built before a token was obtained.
    #[error("the client has no API token; authenticate first")]
    NotAuthenticated,

    /// Arguments that cannot form a request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Validation(#[from] InterfaceValidationError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
