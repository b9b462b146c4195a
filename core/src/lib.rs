//! Typed client core for the Transparent Classroom REST API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `validation` and `fields` describe what a request may carry: constraints
//!   compose into validators, validators guard fields, and interface field
//!   sets check a whole binding map at once.
//! - `models` maps typed records to and from dictionaries; `serializers` and
//!   `deserializers` reshape them for the wire.
//! - `api` is the catalog of routes and entry points; `client` drives it,
//!   split into `build_*` and `parse_*` so the I/O boundary is explicit.
//! - Models are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod deserializers;
pub mod error;
pub mod fields;
pub mod http;
pub mod models;
pub mod serializers;
pub mod types;
pub mod validation;
pub mod value;

pub use api::{Api, EndpointBehavior, EntryPoint, Interface, ModelType, Route, RouteComponent};
pub use client::TransparentClassroomClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    ActivityQuery, ApplicationSubmission, ChildDateRange, ChildrenQuery, ClassroomQuery,
    ConferenceReportQuery, FormQuery, LevelQuery, OnlineApplicationQuery, Paging, UserQuery,
};
pub use value::{Map, Value};
