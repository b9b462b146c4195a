//! In-memory imitation of the Transparent Classroom REST API.
//!
//! # Design
//! Routes mirror the service's `/api/v1/<model>[/<id>].json` layout. Every
//! route except authentication sits behind a middleware that checks the
//! `X-TransparentClassroomToken` header. Records live in a seeded `Store`
//! behind an `RwLock`; lists honor `page` / `per_page`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, warn};

pub mod fixtures;

pub use fixtures::{
    Activity, Child, Classroom, Event, Level, OnlineApplication, School, Session, Store, User,
};
use fixtures::{Acceptance, ApplicationSubmission, ChildUpdate};

pub const TOKEN_HEADER: &str = "X-TransparentClassroomToken";

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));

    let protected = Router::new()
        .route("/api/v1/activity.json", get(list_activities))
        .route("/api/v1/children.json", get(list_children))
        .route("/api/v1/children/{file}", get(get_child).put(update_child))
        .route("/api/v1/classrooms.json", get(list_classrooms))
        .route("/api/v1/conference_reports.json", get(list_conference_reports))
        .route("/api/v1/events.json", get(list_events))
        .route("/api/v1/forms.json", get(list_forms))
        .route("/api/v1/forms/{file}", get(get_form))
        .route("/api/v1/form_templates.json", get(list_form_templates))
        .route("/api/v1/lesson_sets/{file}", get(get_lesson_set))
        .route("/api/v1/levels.json", get(list_levels))
        .route("/api/v1/levels/by_date.json", get(list_levels_by_date))
        .route(
            "/api/v1/online_applications.json",
            get(list_online_applications).post(submit_online_application),
        )
        .route(
            "/api/v1/online_applications/{file}",
            get(get_online_application),
        )
        .route(
            "/api/v1/online_applications/{id}/accept_application.json",
            post(accept_online_application),
        )
        .route("/api/v1/schools.json", get(list_schools))
        .route("/api/v1/sessions.json", get(list_sessions))
        .route("/api/v1/users.json", get(list_users))
        .route("/api/v1/users/{file}", get(get_user))
        .route_layer(middleware::from_fn(require_token));

    Router::new()
        .route("/api/v1/authenticate.json", get(authenticate))
        .merge(protected)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock Transparent Classroom API listening");
    }
    axum::serve(listener, app()).await
}

async fn require_token(headers: HeaderMap, request: Request, next: Next) -> Result<Response, StatusCode> {
    match headers.get(TOKEN_HEADER).and_then(|value| value.to_str().ok()) {
        Some(fixtures::TOKEN) => Ok(next.run(request).await),
        other => {
            warn!(path = %request.uri().path(), token = ?other, "rejected request");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Parse the id out of a `<id>.json` path segment.
fn record_id(file: &str) -> Result<i64, StatusCode> {
    file.strip_suffix(".json")
        .and_then(|id| id.parse().ok())
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl Paging {
    fn slice<T: Clone>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(50).max(1);
        items
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub api_token: String,
    pub school_id: i64,
    #[serde(flatten)]
    pub user: User,
}

async fn authenticate(
    State(db): State<Db>,
    Query(credentials): Query<Credentials>,
) -> Result<Json<AuthResponse>, StatusCode> {
    if credentials.email != fixtures::EMAIL || credentials.password != fixtures::PASSWORD {
        warn!(email = %credentials.email, "invalid credentials");
        return Err(StatusCode::UNAUTHORIZED);
    }
    let store = db.read().await;
    let user = store
        .users
        .values()
        .find(|user| user.email == credentials.email)
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(AuthResponse {
        api_token: fixtures::TOKEN.to_string(),
        school_id: fixtures::SCHOOL_ID,
        user,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ActivityFilter {
    pub child_id: Option<i64>,
    pub classroom_id: Option<i64>,
    #[serde(default)]
    pub only_photos: bool,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
}

async fn list_activities(
    State(db): State<Db>,
    Query(filter): Query<ActivityFilter>,
    Query(paging): Query<Paging>,
) -> Result<Json<Vec<Activity>>, StatusCode> {
    if filter.child_id.is_none() && filter.classroom_id.is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let store = db.read().await;
    let matching = store.activities.iter().filter(|activity| {
        filter.child_id.map_or(true, |id| activity.child_ids.contains(&id))
            && filter.classroom_id.map_or(true, |id| activity.classroom_id == id)
            && (!filter.only_photos || activity.photo_url.is_some())
            && in_range(&activity.date, &filter.date_start, &filter.date_end)
    });
    Ok(Json(paging.slice(matching.cloned())))
}

/// ISO dates and timestamps compare correctly as strings.
fn in_range(value: &str, start: &Option<String>, end: &Option<String>) -> bool {
    let day = value.get(..10).unwrap_or(value);
    start.as_deref().map_or(true, |start| day >= start) && end.as_deref().map_or(true, |end| day <= end)
}

#[derive(Debug, Deserialize)]
pub struct ChildrenFilter {
    pub classroom_id: Option<i64>,
    pub session_id: Option<i64>,
    #[serde(default)]
    pub only_current: bool,
}

async fn list_children(
    State(db): State<Db>,
    Query(filter): Query<ChildrenFilter>,
    Query(paging): Query<Paging>,
) -> Json<Vec<Child>> {
    let store = db.read().await;
    let matching = store.children.values().filter(|child| {
        filter.classroom_id.map_or(true, |id| child.classroom_ids.contains(&id))
            && filter.session_id.map_or(true, |id| child.session_ids.contains(&id))
            && (!filter.only_current || child.current)
    });
    Json(paging.slice(matching.cloned()))
}

async fn get_child(State(db): State<Db>, Path(file): Path<String>) -> Result<Json<Child>, StatusCode> {
    let id = record_id(&file)?;
    let store = db.read().await;
    store.children.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_child(
    State(db): State<Db>,
    Path(file): Path<String>,
    Json(update): Json<ChildUpdate>,
) -> Result<Json<Child>, StatusCode> {
    let id = record_id(&file)?;
    let mut store = db.write().await;
    let child = store.children.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    child.apply(update);
    debug!(child_id = id, "updated child");
    Ok(Json(child.clone()))
}

#[derive(Debug, Deserialize)]
pub struct ClassroomFilter {
    #[serde(default)]
    pub show_inactive: bool,
}

async fn list_classrooms(
    State(db): State<Db>,
    Query(filter): Query<ClassroomFilter>,
    Query(paging): Query<Paging>,
) -> Json<Vec<Classroom>> {
    let store = db.read().await;
    let matching = store
        .classrooms
        .iter()
        .filter(|classroom| filter.show_inactive || classroom.active);
    Json(paging.slice(matching.cloned()))
}

#[derive(Debug, Deserialize)]
pub struct ChildFilter {
    pub child_id: Option<i64>,
    pub form_template_id: Option<i64>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
}

impl ChildFilter {
    fn matches(&self, record: &Value) -> bool {
        let field = |key: &str| record.get(key).and_then(Value::as_i64);
        let created = record.get("created_at").and_then(Value::as_str).unwrap_or_default();
        self.child_id.map_or(true, |id| field("child_id") == Some(id))
            && self
                .form_template_id
                .map_or(true, |id| field("form_template_id") == Some(id))
            && in_range(created, &self.created_after, &self.created_before)
    }
}

async fn list_conference_reports(
    State(db): State<Db>,
    Query(filter): Query<ChildFilter>,
    Query(paging): Query<Paging>,
) -> Json<Vec<Value>> {
    let store = db.read().await;
    let matching = store
        .conference_reports
        .iter()
        .filter(|report| filter.matches(report));
    Json(paging.slice(matching.cloned()))
}

#[derive(Debug, Deserialize)]
pub struct DateRangeFilter {
    pub child_id: i64,
    pub date_start: String,
    pub date_end: String,
}

async fn list_events(
    State(db): State<Db>,
    Query(filter): Query<DateRangeFilter>,
    Query(paging): Query<Paging>,
) -> Json<Vec<Event>> {
    let store = db.read().await;
    let (start, end) = (Some(filter.date_start.clone()), Some(filter.date_end.clone()));
    let matching = store
        .events
        .iter()
        .filter(|event| event.child_id == filter.child_id && in_range(&event.time, &start, &end));
    Json(paging.slice(matching.cloned()))
}

async fn list_forms(
    State(db): State<Db>,
    Query(filter): Query<ChildFilter>,
    Query(paging): Query<Paging>,
) -> Json<Vec<Value>> {
    let store = db.read().await;
    let matching = store.forms.values().filter(|form| filter.matches(form));
    Json(paging.slice(matching.cloned()))
}

async fn get_form(State(db): State<Db>, Path(file): Path<String>) -> Result<Json<Value>, StatusCode> {
    let id = record_id(&file)?;
    let store = db.read().await;
    store.forms.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn list_form_templates(
    State(db): State<Db>,
    Query(paging): Query<Paging>,
) -> Json<Vec<Value>> {
    let store = db.read().await;
    Json(paging.slice(store.form_templates.iter().cloned()))
}

#[derive(Debug, Deserialize)]
pub struct LessonSetFormat {
    pub format: Option<String>,
}

async fn get_lesson_set(
    State(db): State<Db>,
    Path(file): Path<String>,
    Query(query): Query<LessonSetFormat>,
) -> Result<Json<Value>, StatusCode> {
    if !matches!(query.format.as_deref(), None | Some("short") | Some("long")) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let id = record_id(&file)?;
    let store = db.read().await;
    store.lesson_sets.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
pub struct LevelFilter {
    pub child_id: i64,
    pub lesson_set_id: Option<i64>,
}

async fn list_levels(
    State(db): State<Db>,
    Query(filter): Query<LevelFilter>,
    Query(paging): Query<Paging>,
) -> Json<Vec<Level>> {
    let store = db.read().await;
    let matching = store.levels.iter().filter(|level| {
        level.child_id == filter.child_id
            && filter.lesson_set_id.map_or(true, |id| level.lesson_set_id == id)
    });
    Json(paging.slice(matching.cloned()))
}

async fn list_levels_by_date(
    State(db): State<Db>,
    Query(filter): Query<DateRangeFilter>,
    Query(paging): Query<Paging>,
) -> Json<Vec<Level>> {
    let store = db.read().await;
    let (start, end) = (Some(filter.date_start.clone()), Some(filter.date_end.clone()));
    let matching = store
        .levels
        .iter()
        .filter(|level| level.child_id == filter.child_id && in_range(&level.date, &start, &end));
    Json(paging.slice(matching.cloned()))
}

#[derive(Debug, Deserialize)]
pub struct ApplicationFilter {
    pub created_at: Option<String>,
}

async fn list_online_applications(
    State(db): State<Db>,
    Query(filter): Query<ApplicationFilter>,
    Query(paging): Query<Paging>,
) -> Json<Vec<OnlineApplication>> {
    let store = db.read().await;
    let matching = store.online_applications.values().filter(|application| {
        filter
            .created_at
            .as_deref()
            .map_or(true, |created_at| application.created_at.as_str() >= created_at)
    });
    Json(paging.slice(matching.cloned()))
}

async fn get_online_application(
    State(db): State<Db>,
    Path(file): Path<String>,
) -> Result<Json<OnlineApplication>, StatusCode> {
    let id = record_id(&file)?;
    let store = db.read().await;
    store
        .online_applications
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn submit_online_application(
    State(db): State<Db>,
    Json(submission): Json<ApplicationSubmission>,
) -> Result<(StatusCode, Json<OnlineApplication>), StatusCode> {
    if !matches!(
        submission.silence_notifications.as_deref(),
        Some("true") | Some("false")
    ) {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let mut store = db.write().await;
    let application = OnlineApplication {
        id: store.next_application_id(),
        school_id: fixtures::SCHOOL_ID,
        kind: "online_application".to_string(),
        state: "submitted".to_string(),
        created_at: "2023-06-01T12:00:00.000000+0000".to_string(),
        fields: submission
            .fields
            .into_iter()
            .map(|answer| (answer.name, answer.value))
            .collect(),
    };
    debug!(
        application_id = application.id,
        template_id = ?submission.template_id,
        "submitted online application"
    );
    store
        .online_applications
        .insert(application.id, application.clone());
    Ok((StatusCode::CREATED, Json(application)))
}

async fn accept_online_application(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(acceptance): Json<Acceptance>,
) -> Result<Json<OnlineApplication>, StatusCode> {
    let mut store = db.write().await;
    if !store
        .classrooms
        .iter()
        .any(|classroom| classroom.id == acceptance.classroom_id)
    {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let application = store
        .online_applications
        .get_mut(&id)
        .ok_or(StatusCode::NOT_FOUND)?;
    application.state = "accepted".to_string();
    Ok(Json(application.clone()))
}

async fn list_schools(State(db): State<Db>, Query(paging): Query<Paging>) -> Json<Vec<School>> {
    let store = db.read().await;
    Json(paging.slice(store.schools.iter().cloned()))
}

async fn list_sessions(State(db): State<Db>, Query(paging): Query<Paging>) -> Json<Vec<Session>> {
    let store = db.read().await;
    Json(paging.slice(store.sessions.iter().cloned()))
}

/// `roles[]` repeats, so the query is read as raw pairs.
async fn list_users(
    State(db): State<Db>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<User>>, StatusCode> {
    let mut roles = Vec::new();
    let mut classroom_id = None;
    let mut paging = Paging::default();
    for (key, value) in pairs {
        match key.as_str() {
            "roles[]" => roles.push(value),
            "classroom_id" => classroom_id = Some(parse_number::<i64>(&value)?),
            "page" => paging.page = Some(parse_number(&value)?),
            "per_page" => paging.per_page = Some(parse_number(&value)?),
            _ => {}
        }
    }
    let store = db.read().await;
    let matching = store.users.values().filter(|user| {
        classroom_id.map_or(true, |id| user.accessible_classroom_ids.contains(&id))
            && (roles.is_empty() || user.roles.iter().any(|role| roles.contains(role)))
    });
    Ok(Json(paging.slice(matching.cloned())))
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, StatusCode> {
    value.parse().map_err(|_| StatusCode::BAD_REQUEST)
}

async fn get_user(State(db): State<Db>, Path(file): Path<String>) -> Result<Json<User>, StatusCode> {
    let id = record_id(&file)?;
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}
