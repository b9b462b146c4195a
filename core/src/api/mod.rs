//! Route, interface and entry-point catalog of the Transparent Classroom API.
//!
//! # Design
//! An `EntryPoint` pairs a `Route` (where to send a request) with an
//! `Interface` (which method to use and which headers and parameters it
//! accepts). The `Api` registry keys entry points by the model they serve and
//! the behavior they implement, so the client asks for "list children" and
//! never spells out a URL.

use std::fmt;

pub mod catalog;
pub mod interface;
pub mod registry;
pub mod route;

pub use interface::Interface;
pub use registry::{Api, EntryPoint};
pub use route::{Route, RouteComponent};

/// The resource an entry point serves. The wire value doubles as the default
/// model segment of the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelType {
    Activity,
    Authenticate,
    Children,
    Classrooms,
    ConferenceReports,
    Events,
    Forms,
    FormTemplates,
    LessonSets,
    Levels,
    OnlineApplications,
    Schools,
    Sessions,
    Users,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Activity => "activity",
            ModelType::Authenticate => "authenticate",
            ModelType::Children => "children",
            ModelType::Classrooms => "classrooms",
            ModelType::ConferenceReports => "conference_reports",
            ModelType::Events => "events",
            ModelType::Forms => "forms",
            ModelType::FormTemplates => "form_templates",
            ModelType::LessonSets => "lesson_sets",
            ModelType::Levels => "levels",
            ModelType::OnlineApplications => "online_applications",
            ModelType::Schools => "schools",
            ModelType::Sessions => "sessions",
            ModelType::Users => "users",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an entry point does with its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EndpointBehavior {
    Accept,
    List,
    Show,
    ShowAll,
    ShowFiltered,
    Submit,
    Update,
}

impl EndpointBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointBehavior::Accept => "ACCEPT",
            EndpointBehavior::List => "LIST",
            EndpointBehavior::Show => "SHOW",
            EndpointBehavior::ShowAll => "SHOW_ALL",
            EndpointBehavior::ShowFiltered => "SHOW_FILTERED",
            EndpointBehavior::Submit => "SUBMIT",
            EndpointBehavior::Update => "UPDATE",
        }
    }
}

impl fmt::Display for EndpointBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_types_render_wire_values() {
        assert_eq!(ModelType::ConferenceReports.to_string(), "conference_reports");
        assert_eq!(ModelType::Activity.as_str(), "activity");
        assert_eq!(EndpointBehavior::ShowFiltered.to_string(), "SHOW_FILTERED");
    }
}
