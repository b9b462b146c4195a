//! HTTP request builder and response parser for the Transparent Classroom
//! API.
//!
//! # Design
//! `TransparentClassroomClient` holds the host, the credentials and the API
//! token; it never touches the network. Each operation is split into a
//! `build_*` method that validates its inputs against the entry point's
//! interface and produces an `HttpRequest`, and a `parse_*` method that
//! consumes an `HttpResponse` and runs the matching deserializer. The caller
//! executes the actual HTTP round-trip in between.
//!
//! `parse_authenticate` stores the returned token; every other request needs
//! one and fails with `NotAuthenticated` until it is set. Changing the email
//! or password drops the token.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::api::catalog::{MASQUERADE_HEADER, SCHOOL_HEADER, TOKEN_HEADER};
use crate::api::{Api, EndpointBehavior, ModelType};
use crate::config::{normalize_host, ClientConfig};
use crate::deserializers::{
    ActivityDeserializer, AuthDeserializer, ChildDeserializer, ClassroomDeserializer,
    ConferenceReportDeserializer, Deserializer, EventDeserializer, FormDeserializer,
    FormTemplateDeserializer, LessonSetDeserializer, LevelDeserializer,
    OnlineApplicationDeserializer, SchoolDeserializer, SessionDeserializer, UserDeserializer,
};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::models::{
    Activity, Auth, Child, Classroom, ConferenceReport, Event, Form, FormTemplate, Formatter,
    LessonSet, Level, OnlineApplication, School, Session, User,
};
use crate::serializers::ChildSerializer;
use crate::types::{
    bindings, ActivityQuery, ApplicationSubmission, ChildDateRange, ChildrenQuery,
    ClassroomQuery, ConferenceReportQuery, FormQuery, LevelQuery, OnlineApplicationQuery,
    Paging, UserQuery,
};
use crate::value::{Map, Value};

/// Request builder and response parser for the Transparent Classroom API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct TransparentClassroomClient {
    host: String,
    email: String,
    password: String,
    masquerade_id: Option<i64>,
    school_id: Option<i64>,
    token: Option<String>,
    api: Api,
}

impl TransparentClassroomClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_api(config, Api::transparent_classroom())
    }

    /// A client routing through a custom entry-point registry.
    pub fn with_api(config: ClientConfig, api: Api) -> Self {
        Self {
            host: normalize_host(&config.host),
            email: config.email,
            password: config.password,
            masquerade_id: config.masquerade_id,
            school_id: config.school_id,
            token: None,
            api,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: &str) {
        self.host = normalize_host(host);
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.token = None;
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
        self.token = None;
    }

    pub fn masquerade_id(&self) -> Option<i64> {
        self.masquerade_id
    }

    pub fn set_masquerade_id(&mut self, id: Option<i64>) {
        self.masquerade_id = id;
    }

    pub fn school_id(&self) -> Option<i64> {
        self.school_id
    }

    pub fn set_school_id(&mut self, id: Option<i64>) {
        self.school_id = id;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Use a token obtained elsewhere instead of authenticating.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Header bindings sent with authenticated requests. Ids travel as
    /// strings.
    pub fn headers(&self) -> Map {
        bindings([
            (TOKEN_HEADER, Value::from(self.token.clone())),
            (
                MASQUERADE_HEADER,
                Value::from(self.masquerade_id.map(|id| id.to_string())),
            ),
            (
                SCHOOL_HEADER,
                Value::from(self.school_id.map(|id| id.to_string())),
            ),
        ])
    }

    // -- authentication --

    pub fn build_authenticate(&self) -> Result<HttpRequest, ApiError> {
        let parameters = bindings([
            ("email", Value::from(self.email.as_str())),
            ("password", Value::from(self.password.as_str())),
        ]);
        self.build(
            ModelType::Authenticate,
            EndpointBehavior::Show,
            None,
            parameters,
        )
    }

    /// Parse the sign-in response and keep its API token.
    pub fn parse_authenticate(&mut self, response: HttpResponse) -> Result<Auth, ApiError> {
        let auth = parse_one(AuthDeserializer, response, 200)?;
        let token = auth.api_token.clone().ok_or_else(|| {
            ApiError::DeserializationError("authentication response has no api_token".to_string())
        })?;
        debug!(user_id = ?auth.user.as_ref().and_then(|user| user.id), "authenticated");
        self.token = Some(token);
        Ok(auth)
    }

    // -- activities --

    pub fn build_list_activities(&self, query: &ActivityQuery) -> Result<HttpRequest, ApiError> {
        if query.child_id.is_none() && query.classroom_id.is_none() {
            return Err(ApiError::InvalidRequest(
                "Either a child_id or classroom_id value needs to be provided.".to_string(),
            ));
        }
        self.build(
            ModelType::Activity,
            EndpointBehavior::List,
            None,
            query.bindings(),
        )
    }

    pub fn parse_list_activities(&self, response: HttpResponse) -> Result<Vec<Activity>, ApiError> {
        parse_many(ActivityDeserializer, response, 200)
    }

    // -- children --

    pub fn build_list_children(&self, query: &ChildrenQuery) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Children,
            EndpointBehavior::List,
            None,
            query.bindings(),
        )
    }

    pub fn parse_list_children(&self, response: HttpResponse) -> Result<Vec<Child>, ApiError> {
        parse_many(ChildDeserializer, response, 200)
    }

    /// Fetch one child, optionally as the record stood on `as_of`.
    pub fn build_get_child(
        &self,
        child_id: i64,
        as_of: Option<NaiveDate>,
    ) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Children,
            EndpointBehavior::Show,
            Some(child_id),
            bindings([("as_of", Value::from(as_of))]),
        )
    }

    pub fn parse_get_child(&self, response: HttpResponse) -> Result<Child, ApiError> {
        parse_one(ChildDeserializer, response, 200)
    }

    /// Send the editable, non-null attributes of `child`, as selected by
    /// `ChildSerializer`.
    pub fn build_update_child(&self, child_id: i64, child: &Child) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Children,
            EndpointBehavior::Update,
            Some(child_id),
            ChildSerializer::default().serialize_dict(child),
        )
    }

    pub fn parse_update_child(&self, response: HttpResponse) -> Result<Child, ApiError> {
        parse_one(ChildDeserializer, response, 200)
    }

    // -- classrooms --

    pub fn build_list_classrooms(&self, query: &ClassroomQuery) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Classrooms,
            EndpointBehavior::List,
            None,
            query.bindings(),
        )
    }

    pub fn parse_list_classrooms(&self, response: HttpResponse) -> Result<Vec<Classroom>, ApiError> {
        parse_many(ClassroomDeserializer, response, 200)
    }

    // -- conference reports --

    pub fn build_list_conference_reports(
        &self,
        query: &ConferenceReportQuery,
    ) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::ConferenceReports,
            EndpointBehavior::List,
            None,
            query.bindings(),
        )
    }

    pub fn parse_list_conference_reports(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<ConferenceReport>, ApiError> {
        parse_many(ConferenceReportDeserializer, response, 200)
    }

    // -- events --

    pub fn build_list_events(&self, query: &ChildDateRange) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Events,
            EndpointBehavior::List,
            None,
            query.bindings(),
        )
    }

    pub fn parse_list_events(&self, response: HttpResponse) -> Result<Vec<Event>, ApiError> {
        parse_many(EventDeserializer, response, 200)
    }

    // -- forms --

    pub fn build_list_forms(&self, query: &FormQuery) -> Result<HttpRequest, ApiError> {
        self.build(ModelType::Forms, EndpointBehavior::List, None, query.bindings())
    }

    pub fn parse_list_forms(&self, response: HttpResponse) -> Result<Vec<Form>, ApiError> {
        parse_many(FormDeserializer, response, 200)
    }

    pub fn build_get_form(&self, form_id: i64) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Forms,
            EndpointBehavior::Show,
            Some(form_id),
            Map::new(),
        )
    }

    pub fn parse_get_form(&self, response: HttpResponse) -> Result<Form, ApiError> {
        parse_one(FormDeserializer, response, 200)
    }

    pub fn build_list_form_templates(&self, paging: Paging) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::FormTemplates,
            EndpointBehavior::List,
            None,
            paging.bindings(),
        )
    }

    pub fn parse_list_form_templates(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<FormTemplate>, ApiError> {
        parse_many(FormTemplateDeserializer, response, 200)
    }

    // -- lesson sets and levels --

    /// `format` is `"short"` or `"long"`.
    pub fn build_get_lesson_set(
        &self,
        lesson_set_id: i64,
        format: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::LessonSets,
            EndpointBehavior::Show,
            Some(lesson_set_id),
            bindings([("format", Value::from(format))]),
        )
    }

    pub fn parse_get_lesson_set(&self, response: HttpResponse) -> Result<LessonSet, ApiError> {
        parse_one(LessonSetDeserializer, response, 200)
    }

    pub fn build_list_levels(&self, query: &LevelQuery) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Levels,
            EndpointBehavior::ShowAll,
            None,
            query.bindings(),
        )
    }

    pub fn parse_list_levels(&self, response: HttpResponse) -> Result<Vec<Level>, ApiError> {
        parse_many(LevelDeserializer, response, 200)
    }

    pub fn build_list_levels_by_date(
        &self,
        query: &ChildDateRange,
    ) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Levels,
            EndpointBehavior::ShowFiltered,
            None,
            query.bindings(),
        )
    }

    pub fn parse_list_levels_by_date(&self, response: HttpResponse) -> Result<Vec<Level>, ApiError> {
        parse_many(LevelDeserializer, response, 200)
    }

    // -- online applications --

    pub fn build_list_online_applications(
        &self,
        query: &OnlineApplicationQuery,
    ) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::OnlineApplications,
            EndpointBehavior::List,
            None,
            query.bindings(),
        )
    }

    pub fn parse_list_online_applications(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<OnlineApplication>, ApiError> {
        parse_many(OnlineApplicationDeserializer, response, 200)
    }

    pub fn build_get_online_application(&self, application_id: i64) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::OnlineApplications,
            EndpointBehavior::Show,
            Some(application_id),
            Map::new(),
        )
    }

    pub fn parse_get_online_application(
        &self,
        response: HttpResponse,
    ) -> Result<OnlineApplication, ApiError> {
        parse_one(OnlineApplicationDeserializer, response, 200)
    }

    pub fn build_submit_online_application(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::OnlineApplications,
            EndpointBehavior::Submit,
            None,
            submission.bindings(),
        )
    }

    pub fn parse_submit_online_application(
        &self,
        response: HttpResponse,
    ) -> Result<OnlineApplication, ApiError> {
        parse_one(OnlineApplicationDeserializer, response, 201)
    }

    /// Accept an application, enrolling the applicant in `classroom_id`.
    pub fn build_accept_online_application(
        &self,
        application_id: i64,
        classroom_id: i64,
    ) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::OnlineApplications,
            EndpointBehavior::Accept,
            Some(application_id),
            bindings([("classroom_id", Value::from(classroom_id))]),
        )
    }

    pub fn parse_accept_online_application(
        &self,
        response: HttpResponse,
    ) -> Result<OnlineApplication, ApiError> {
        parse_one(OnlineApplicationDeserializer, response, 200)
    }

    // -- schools, sessions, users --

    pub fn build_list_schools(&self, paging: Paging) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Schools,
            EndpointBehavior::List,
            None,
            paging.bindings(),
        )
    }

    pub fn parse_list_schools(&self, response: HttpResponse) -> Result<Vec<School>, ApiError> {
        parse_many(SchoolDeserializer, response, 200)
    }

    pub fn build_list_sessions(&self, paging: Paging) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Sessions,
            EndpointBehavior::List,
            None,
            paging.bindings(),
        )
    }

    pub fn parse_list_sessions(&self, response: HttpResponse) -> Result<Vec<Session>, ApiError> {
        parse_many(SessionDeserializer, response, 200)
    }

    pub fn build_list_users(&self, query: &UserQuery) -> Result<HttpRequest, ApiError> {
        self.build(ModelType::Users, EndpointBehavior::List, None, query.bindings())
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        parse_many(UserDeserializer, response, 200)
    }

    pub fn build_get_user(&self, user_id: i64) -> Result<HttpRequest, ApiError> {
        self.build(
            ModelType::Users,
            EndpointBehavior::Show,
            Some(user_id),
            Map::new(),
        )
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_one(UserDeserializer, response, 200)
    }

    /// Route, validate and render one request. GET parameters go into the
    /// query string; PUT and POST parameters form a JSON body.
    fn build(
        &self,
        model: ModelType,
        behavior: EndpointBehavior,
        object_id: Option<i64>,
        parameters: Map,
    ) -> Result<HttpRequest, ApiError> {
        let entry_point = self.api.route(model, behavior)?;
        let interface = entry_point.interface();

        let needs_token = interface
            .headers()
            .iter()
            .any(|header| header.base_name() == TOKEN_HEADER);
        if needs_token && self.token.is_none() {
            return Err(ApiError::NotAuthenticated);
        }

        let (mut headers, mut parameters) = interface.validate(&self.headers(), &parameters)?;
        // Sorted keys keep the rendered request independent of binding order.
        headers.sort_keys();
        parameters.sort_keys();

        let object_id = object_id.map(|id| id.to_string()).unwrap_or_default();
        let route = entry_point
            .route()
            .apply([("model_name", model.as_str()), ("object_id", object_id.as_str())]);
        let mut path = format!("{}/{route}", self.host);

        let mut headers: Vec<(String, String)> = headers
            .iter()
            .filter_map(|(name, value)| wire_value(value).map(|value| (name.clone(), value)))
            .collect();

        let method = interface.method();
        let body = match method {
            HttpMethod::Get => {
                let query = encode_query(&parameters)?;
                if !query.is_empty() {
                    path = format!("{path}?{query}");
                }
                None
            }
            HttpMethod::Post | HttpMethod::Put => {
                headers.push(("content-type".to_string(), "application/json".to_string()));
                let body = serde_json::to_string(&Formatter::jsonify(&parameters))
                    .map_err(|e| ApiError::SerializationError(e.to_string()))?;
                Some(body)
            }
        };

        debug!(entry_point = entry_point.name(), %method, %path, "built request");
        Ok(HttpRequest {
            method,
            path,
            headers,
            body,
        })
    }
}

/// Render a scalar binding as it appears on the wire. Lists and maps have no
/// scalar form.
fn wire_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::List(_) | Value::Map(_) => None,
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Int(number) => Some(number.to_string()),
        Value::Float(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Date(date) => Some(Formatter::date_to_str(date)),
        Value::DateTime(datetime) => Some(Formatter::datetime_to_str(datetime)),
    }
}

/// URL-encode `parameters`. A list becomes one pair per element under the
/// same key.
fn encode_query(parameters: &Map) -> Result<String, ApiError> {
    let mut pairs = Vec::new();
    for (key, value) in parameters {
        match value {
            Value::List(items) => {
                pairs.extend(
                    items
                        .iter()
                        .filter_map(wire_value)
                        .map(|item| (key.as_str(), item)),
                );
            }
            Value::Map(_) => {
                let json = serde_json::to_string(&Formatter::jsonify_value(value))
                    .map_err(|e| ApiError::SerializationError(e.to_string()))?;
                pairs.push((key.as_str(), json));
            }
            other => pairs.extend(wire_value(other).map(|item| (key.as_str(), item))),
        }
    }
    serde_urlencoded::to_string(&pairs).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    warn!(status = response.status, expected, "unexpected response status");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_body(response: &HttpResponse) -> Result<Value, ApiError> {
    let json: serde_json::Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    Ok(Value::from(json))
}

fn parse_one<D: Deserializer>(
    deserializer: D,
    response: HttpResponse,
    expected: u16,
) -> Result<D::Output, ApiError> {
    check_status(&response, expected)?;
    Ok(deserializer.deserialize_value(parse_body(&response)?)?)
}

fn parse_many<D: Deserializer>(
    deserializer: D,
    response: HttpResponse,
    expected: u16,
) -> Result<Vec<D::Output>, ApiError> {
    check_status(&response, expected)?;
    Ok(deserializer.batch_value(parse_body(&response)?)?)
}
