//! The entry points exposed by the Transparent Classroom service.

use crate::api::{Api, EndpointBehavior, EntryPoint, Interface, ModelType, Route, RouteComponent};
use crate::fields::{Field, InterfaceField};
use crate::http::HttpMethod;

pub const TOKEN_HEADER: &str = "X-TransparentClassroomToken";
pub const MASQUERADE_HEADER: &str = "X-TransparentClassroomMasqueradeId";
pub const SCHOOL_HEADER: &str = "X-TransparentClassroomSchoolId";

/// Values accepted by the `roles[]` filter of the user listing.
pub const USER_ROLES: [&str; 5] = ["teacher", "parent", "admin", "billing_manager", "family_member"];

/// Values accepted by the `format` parameter of the lesson set endpoint.
pub const LESSON_SET_FORMATS: [&str; 2] = ["short", "long"];

fn list_route(model: ModelType) -> Route {
    Route::new(model, [RouteComponent::API_V1, RouteComponent::MODEL_NAME])
}

fn object_route(model: ModelType) -> Route {
    Route::new(
        model,
        [
            RouteComponent::API_V1,
            RouteComponent::MODEL_NAME,
            RouteComponent::OBJECT_ID,
        ],
    )
}

fn param(field: Field) -> InterfaceField {
    InterfaceField::new(field)
}

fn auth_headers() -> [InterfaceField; 3] {
    [
        param(Field::string(TOKEN_HEADER).required(true)),
        param(Field::string(MASQUERADE_HEADER)),
        param(Field::string(SCHOOL_HEADER)),
    ]
}

fn paging() -> [InterfaceField; 2] {
    [
        param(Field::positive_integer("page")),
        param(Field::positive_integer("per_page")),
    ]
}

/// An authenticated interface with the standard headers.
fn authed(method: HttpMethod, behavior: EndpointBehavior) -> Interface {
    Interface::new(method, behavior).with_headers(auth_headers())
}

fn get(behavior: EndpointBehavior) -> Interface {
    authed(HttpMethod::Get, behavior)
}

/// Every entry point of the service.
pub fn entry_points() -> Vec<EntryPoint> {
    use EndpointBehavior::*;

    vec![
        EntryPoint::new(
            "Authentication Entry Point",
            list_route(ModelType::Authenticate),
            Interface::new(HttpMethod::Get, Show).with_parameters([
                param(Field::string("email").required(true)),
                param(Field::string("password").required(true)),
            ]),
        ),
        EntryPoint::new(
            "List Activities Entry Point",
            list_route(ModelType::Activity),
            get(List)
                .with_parameters([
                    param(Field::model_id("child_id")),
                    param(Field::model_id("classroom_id")),
                    param(Field::boolean("only_photos")),
                    param(Field::boolean("only_portfolio")),
                    param(Field::date("date_start")),
                    param(Field::date("date_end")),
                ])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "List Children Entry Point",
            list_route(ModelType::Children),
            get(List)
                .with_parameters([
                    param(Field::model_id("classroom_id")),
                    param(Field::model_id("session_id")),
                    param(Field::boolean("only_current")),
                ])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "Get Child Entry Point",
            object_route(ModelType::Children),
            get(Show).with_parameters([param(Field::date("as_of"))]),
        ),
        EntryPoint::new(
            "Update Child Entry Point",
            object_route(ModelType::Children),
            authed(HttpMethod::Put, Update).with_parameters([
                param(Field::string("first_name")),
                param(Field::string("last_name")),
                param(Field::date("birth_date")),
                param(Field::new("gender")),
                param(Field::string("program")),
                param(Field::new("ethnicity")),
                param(Field::new("household_income")),
                param(Field::new("dominant_language")),
                param(Field::new("grade")),
                param(Field::string("student_id")),
                param(Field::new("hours_string")),
                param(Field::string("allergies")),
                param(Field::string("notes")),
                param(Field::new("approved_adults_string")),
                param(Field::new("emergency_contacts_string")),
            ]),
        ),
        EntryPoint::new(
            "List Classrooms Entry Point",
            list_route(ModelType::Classrooms),
            get(List)
                .with_parameters([param(Field::boolean("show_inactive"))])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "List Conference Reports Entry Point",
            list_route(ModelType::ConferenceReports),
            get(List)
                .with_parameters([
                    param(Field::model_id("child_id")),
                    param(Field::date("created_after")),
                    param(Field::date("created_before")),
                ])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "List Events Entry Point",
            list_route(ModelType::Events),
            get(List)
                .with_parameters([
                    param(Field::model_id("child_id").required(true)),
                    param(Field::date("date_start").required(true)),
                    param(Field::date("date_end").required(true)),
                ])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "List Forms Entry Point",
            list_route(ModelType::Forms),
            get(List)
                .with_parameters([
                    param(Field::model_id("form_template_id")),
                    param(Field::model_id("child_id")),
                    param(Field::date("created_before")),
                    param(Field::date("created_after")),
                ])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "Get Form Entry Point",
            object_route(ModelType::Forms),
            get(Show),
        ),
        EntryPoint::new(
            "List Form Templates Entry Point",
            list_route(ModelType::FormTemplates),
            get(List).with_parameters(paging()),
        ),
        EntryPoint::new(
            "Get Lesson Set Entry Point",
            object_route(ModelType::LessonSets),
            get(Show).with_parameters([param(Field::select("format", LESSON_SET_FORMATS))]),
        ),
        EntryPoint::new(
            "List Levels Entry Point",
            list_route(ModelType::Levels),
            get(ShowAll)
                .with_parameters([
                    param(Field::model_id("child_id").required(true)),
                    param(Field::model_id("lesson_set_id")),
                ])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "List Filtered Levels Entry Point",
            Route::new(
                ModelType::Levels,
                [
                    RouteComponent::API_V1,
                    RouteComponent::MODEL_NAME,
                    RouteComponent::BY_DATE,
                ],
            ),
            get(ShowFiltered)
                .with_parameters([
                    param(Field::model_id("child_id").required(true)),
                    param(Field::date("date_start").required(true)),
                    param(Field::date("date_end").required(true)),
                ])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "List Online Applications Entry Point",
            list_route(ModelType::OnlineApplications),
            get(List)
                .with_parameters([param(Field::date_time("created_at"))])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "Get Online Application Entry Point",
            object_route(ModelType::OnlineApplications),
            get(Show),
        ),
        EntryPoint::new(
            "Submit Online Application Entry Point",
            list_route(ModelType::OnlineApplications),
            authed(HttpMethod::Post, Submit).with_parameters([
                param(Field::new("fields")),
                param(Field::model_id("template_id")),
                param(Field::boolean("silence_notifications").required(true)),
            ]),
        ),
        EntryPoint::new(
            "Accept Online Application Entry Point",
            Route::new(
                ModelType::OnlineApplications,
                [
                    RouteComponent::API_V1,
                    RouteComponent::MODEL_NAME,
                    RouteComponent::OBJECT_ID,
                    RouteComponent::ACCEPT_APPLICATION,
                ],
            ),
            authed(HttpMethod::Post, Accept)
                .with_parameters([param(Field::model_id("classroom_id").required(true))]),
        ),
        EntryPoint::new(
            "List Schools Entry Point",
            list_route(ModelType::Schools),
            get(List).with_parameters(paging()),
        ),
        EntryPoint::new(
            "List Sessions Entry Point",
            list_route(ModelType::Sessions),
            get(List).with_parameters(paging()),
        ),
        EntryPoint::new(
            "List Users Entry Point",
            list_route(ModelType::Users),
            get(List)
                .with_parameters([
                    param(Field::model_id("classroom_id")),
                    param(Field::multi_select("roles[]", USER_ROLES)),
                ])
                .with_parameters(paging()),
        ),
        EntryPoint::new(
            "Get User Entry Point",
            object_route(ModelType::Users),
            get(Show),
        ),
    ]
}

impl Api {
    /// A registry holding every entry point of the service.
    pub fn transparent_classroom() -> Self {
        entry_points().into_iter().collect()
    }
}
