//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the client's
//! operations over real HTTP using ureq. Validates that the core's request
//! building and response parsing work end-to-end with the actual server.

use chrono::NaiveDate;
use transparent_classroom::models::Widget;
use transparent_classroom::{
    ActivityQuery, ApiError, ApplicationSubmission, ChildDateRange, ChildrenQuery, ClassroomQuery,
    ClientConfig, FormQuery, HttpMethod, HttpRequest, HttpResponse, LevelQuery, Paging,
    TransparentClassroomClient, UserQuery,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => {
            let mut builder = agent.get(&req.path);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        (method, body) => {
            let mut builder = match method {
                HttpMethod::Put => agent.put(&req.path),
                _ => agent.post(&req.path),
            };
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse::new(status, body)
}

/// Start a fresh mock server and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn authenticated_client(host: &str) -> TransparentClassroomClient {
    let mut client = TransparentClassroomClient::new(
        ClientConfig::new(mock_server::fixtures::EMAIL, mock_server::fixtures::PASSWORD)
            .host(host),
    );
    let req = client.build_authenticate().unwrap();
    client.parse_authenticate(execute(req)).unwrap();
    client
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn authentication_flow() {
    let host = start_server();

    // Step 1: wrong password is rejected by the server.
    let mut client = TransparentClassroomClient::new(
        ClientConfig::new(mock_server::fixtures::EMAIL, "wrong").host(&host),
    );
    let req = client.build_authenticate().unwrap();
    let err = client.parse_authenticate(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 401, .. }));

    // Step 2: without a token nothing else can be built.
    let err = client.build_list_schools(Paging::default()).unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));

    // Step 3: correct password yields the token and the user.
    client.set_password(mock_server::fixtures::PASSWORD);
    let req = client.build_authenticate().unwrap();
    let auth = client.parse_authenticate(execute(req)).unwrap();
    assert_eq!(client.token(), Some(mock_server::fixtures::TOKEN));
    assert_eq!(auth.school_id, Some(1));
    let user = auth.user.expect("signed-in user");
    assert_eq!(user.email.as_deref(), Some(mock_server::fixtures::EMAIL));
    assert_eq!(user.kind.as_deref(), Some("Teacher"));

    // Step 4: a stale token is rejected by the server.
    client.set_token("stale");
    let req = client.build_list_schools(Paging::default()).unwrap();
    let err = client.parse_list_schools(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
}

#[test]
fn children_lifecycle() {
    let host = start_server();
    let client = authenticated_client(&host);

    // Step 1: list one classroom's children.
    let query = ChildrenQuery {
        classroom_id: Some(1),
        ..ChildrenQuery::default()
    };
    let req = client.build_list_children(&query).unwrap();
    let children = client.parse_list_children(execute(req)).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].birth_date, Some(date(2018, 12, 10)));

    // Step 2: update one of them.
    let mut child = children[1].clone();
    child.notes = Some("Loves maps".into());
    child.ethnicity = Some(vec!["Asian".into()]);
    let req = client.build_update_child(2, &child).unwrap();
    let updated = client.parse_update_child(execute(req)).unwrap();
    assert_eq!(updated.notes.as_deref(), Some("Loves maps"));
    assert_eq!(updated.ethnicity, Some(vec!["Asian".to_string()]));

    // Step 3: fetch it back.
    let req = client.build_get_child(2, Some(date(2023, 6, 1))).unwrap();
    let fetched = client.parse_get_child(execute(req)).unwrap();
    assert_eq!(fetched, updated);

    // Step 4: unknown children are NotFound.
    let req = client.build_get_child(99, None).unwrap();
    let err = client.parse_get_child(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn read_only_catalog() {
    let host = start_server();
    let client = authenticated_client(&host);

    let req = client.build_list_classrooms(&ClassroomQuery::default()).unwrap();
    assert_eq!(client.parse_list_classrooms(execute(req)).unwrap().len(), 1);

    let req = client
        .build_list_classrooms(&ClassroomQuery {
            show_inactive: true,
            ..ClassroomQuery::default()
        })
        .unwrap();
    assert_eq!(client.parse_list_classrooms(execute(req)).unwrap().len(), 2);

    let req = client.build_list_schools(Paging::default()).unwrap();
    let schools = client.parse_list_schools(execute(req)).unwrap();
    assert_eq!(schools[0].kind.as_deref(), Some("School"));

    let req = client.build_list_sessions(Paging::default()).unwrap();
    let sessions = client.parse_list_sessions(execute(req)).unwrap();
    assert_eq!(sessions[0].start_date, Some(date(2022, 9, 1)));

    let req = client
        .build_list_users(&UserQuery {
            roles: vec!["parent".into()],
            ..UserQuery::default()
        })
        .unwrap();
    let users = client.parse_list_users(execute(req)).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, Some(3));

    let req = client.build_get_user(1).unwrap();
    let user = client.parse_get_user(execute(req)).unwrap();
    assert_eq!(user.roles, Some(vec!["teacher".to_string(), "admin".to_string()]));
}

#[test]
fn activities_events_and_levels() {
    let host = start_server();
    let client = authenticated_client(&host);

    let req = client
        .build_list_activities(&ActivityQuery::for_child(1))
        .unwrap();
    let activities = client.parse_list_activities(execute(req)).unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].date, Some(date(2023, 2, 1)));

    let range = ChildDateRange::new(1, date(2023, 2, 1), date(2023, 2, 28));
    let req = client.build_list_events(&range).unwrap();
    let events = client.parse_list_events(execute(req)).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].time.is_some());

    let req = client.build_list_levels(&LevelQuery::new(1)).unwrap();
    assert_eq!(client.parse_list_levels(execute(req)).unwrap().len(), 2);

    let range = ChildDateRange::new(1, date(2023, 1, 1), date(2023, 1, 31));
    let req = client.build_list_levels_by_date(&range).unwrap();
    let levels = client.parse_list_levels_by_date(execute(req)).unwrap();
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].proficiency, Some(2));
}

#[test]
fn forms_and_lesson_sets() {
    let host = start_server();
    let client = authenticated_client(&host);

    let req = client
        .build_list_forms(&FormQuery {
            child_id: Some(1),
            ..FormQuery::default()
        })
        .unwrap();
    let forms = client.parse_list_forms(execute(req)).unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].fields.len(), 2);

    let req = client.build_get_form(1).unwrap();
    let form = client.parse_get_form(execute(req)).unwrap();
    assert_eq!(form.fields[0], Widget::answer("allergies", "none"));

    let req = client.build_list_form_templates(Paging::default()).unwrap();
    let templates = client.parse_list_form_templates(execute(req)).unwrap();
    assert_eq!(templates[0].widgets.len(), 1);

    let req = client.build_get_lesson_set(1, "long").unwrap();
    let lesson_set = client.parse_get_lesson_set(execute(req)).unwrap();
    assert_eq!(lesson_set.scales.len(), 1);
    let lesson = &lesson_set.areas[0].groups[0].lessons[0];
    assert_eq!(lesson.material.as_deref(), Some("Basin"));
    assert_eq!(lesson.photo.as_deref(), Some("https://example.com/basin.jpg"));

    let req = client.build_list_conference_reports(&Default::default()).unwrap();
    let reports = client.parse_list_conference_reports(execute(req)).unwrap();
    assert_eq!(reports[0].widgets.len(), 1);
}

#[test]
fn online_application_lifecycle() {
    let host = start_server();
    let client = authenticated_client(&host);

    // Step 1: submit.
    let submission = ApplicationSubmission {
        template_id: Some(1),
        fields: vec![Widget::answer("child_first_name", "Rosalind")],
        silence_notifications: true,
    };
    let req = client.build_submit_online_application(&submission).unwrap();
    let created = client
        .parse_submit_online_application(execute(req))
        .unwrap();
    assert_eq!(created.state.as_deref(), Some("submitted"));
    assert_eq!(created.fields, submission.fields);
    let id = created.id.expect("server-assigned id");

    // Step 2: accept into a classroom.
    let req = client.build_accept_online_application(id, 1).unwrap();
    let accepted = client
        .parse_accept_online_application(execute(req))
        .unwrap();
    assert_eq!(accepted.state.as_deref(), Some("accepted"));

    // Step 3: both applications are listed.
    let req = client
        .build_list_online_applications(&Default::default())
        .unwrap();
    let applications = client
        .parse_list_online_applications(execute(req))
        .unwrap();
    assert_eq!(applications.len(), 2);

    // Step 4: get the accepted one.
    let req = client.build_get_online_application(id).unwrap();
    let fetched = client.parse_get_online_application(execute(req)).unwrap();
    assert_eq!(fetched, accepted);
}
