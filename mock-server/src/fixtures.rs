//! Records served by the mock API and the in-memory store that holds them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const EMAIL: &str = "teacher@example.com";
pub const PASSWORD: &str = "montessori";
pub const TOKEN: &str = "mock-api-token";
pub const SCHOOL_ID: i64 = 1;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Child {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub program: Option<String>,
    pub ethnicity: Vec<String>,
    pub grade: Option<String>,
    pub student_id: Option<String>,
    pub allergies: Option<String>,
    pub notes: Option<String>,
    pub parent_ids: Vec<i64>,
    pub classroom_ids: Vec<i64>,
    pub session_ids: Vec<i64>,
    pub current: bool,
}

/// Editable child attributes; absent keys are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ChildUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub program: Option<String>,
    pub ethnicity: Option<Vec<String>>,
    pub grade: Option<String>,
    pub student_id: Option<String>,
    pub allergies: Option<String>,
    pub notes: Option<String>,
}

impl Child {
    pub fn apply(&mut self, update: ChildUpdate) {
        merge(&mut self.first_name, update.first_name);
        merge(&mut self.last_name, update.last_name);
        merge(&mut self.birth_date, update.birth_date);
        merge(&mut self.gender, update.gender);
        merge(&mut self.program, update.program);
        merge(&mut self.grade, update.grade);
        merge(&mut self.student_id, update.student_id);
        merge(&mut self.allergies, update.allergies);
        merge(&mut self.notes, update.notes);
        if let Some(ethnicity) = update.ethnicity {
            self.ethnicity = ethnicity;
        }
    }
}

fn merge(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = value;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Classroom {
    pub id: i64,
    pub name: String,
    pub lesson_set_id: Option<i64>,
    pub level: String,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub timezone: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: i64,
    pub name: String,
    pub start_date: String,
    pub stop_date: String,
    pub current: bool,
    pub inactive: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub accessible_classroom_ids: Vec<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: i64,
    pub author_id: i64,
    pub classroom_id: i64,
    pub child_ids: Vec<i64>,
    pub text: String,
    pub date: String,
    pub photo_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: i64,
    pub classroom_id: i64,
    pub child_id: i64,
    pub event_type: String,
    pub value: Option<String>,
    pub time: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Level {
    pub id: i64,
    pub child_id: i64,
    pub lesson_id: i64,
    pub lesson_set_id: i64,
    pub proficiency: i64,
    pub date: String,
    pub planned: bool,
}

/// Online applications carry their answers as a `{question: answer}` map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OnlineApplication {
    pub id: i64,
    pub school_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
    pub created_at: String,
    pub fields: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Answer {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSubmission {
    #[serde(default)]
    pub fields: Vec<Answer>,
    pub template_id: Option<i64>,
    pub silence_notifications: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Acceptance {
    pub classroom_id: i64,
}

#[derive(Clone, Debug)]
pub struct Store {
    pub activities: Vec<Activity>,
    pub children: BTreeMap<i64, Child>,
    pub classrooms: Vec<Classroom>,
    pub conference_reports: Vec<Value>,
    pub events: Vec<Event>,
    pub forms: BTreeMap<i64, Value>,
    pub form_templates: Vec<Value>,
    pub lesson_sets: BTreeMap<i64, Value>,
    pub levels: Vec<Level>,
    pub online_applications: BTreeMap<i64, OnlineApplication>,
    pub schools: Vec<School>,
    pub sessions: Vec<Session>,
    pub users: BTreeMap<i64, User>,
}

impl Store {
    pub fn next_application_id(&self) -> i64 {
        self.online_applications.keys().next_back().map_or(1, |id| id + 1)
    }
}

fn child(id: i64, first_name: &str, birth_date: &str, classroom_id: i64) -> Child {
    Child {
        id,
        first_name: Some(first_name.to_string()),
        last_name: Some("Lovelace".to_string()),
        birth_date: Some(birth_date.to_string()),
        gender: Some("F".to_string()),
        program: Some("Primary".to_string()),
        ethnicity: vec!["Other".to_string()],
        grade: None,
        student_id: Some(format!("S-{id}")),
        allergies: None,
        notes: None,
        parent_ids: vec![3],
        classroom_ids: vec![classroom_id],
        session_ids: vec![1],
        current: true,
    }
}

fn lesson_set() -> Value {
    json!({
        "id": 1,
        "name": "Primary",
        "scales": {"proficiency": ["", "Presented", "Practicing", "Mastered"]},
        "children": [{
            "id": 10,
            "name": "Practical Life",
            "type": "area",
            "children": [{
                "id": 20,
                "name": "Care of Self",
                "type": "group",
                "children": [],
                "lessons": [{
                    "id": 30,
                    "name": "Hand Washing",
                    "type": "lesson",
                    "material_name": "Basin",
                    "profile_photo": "https://example.com/basin.jpg",
                    "children": []
                }]
            }]
        }]
    })
}

impl Default for Store {
    fn default() -> Self {
        let children = [
            child(1, "Ada", "2018-12-10", 1),
            child(2, "Grace", "2019-03-02", 1),
            child(3, "Mary", "2017-07-21", 2),
        ];
        let users = [
            User {
                id: 1,
                kind: "Teacher".to_string(),
                first_name: "Maria".to_string(),
                last_name: "Montessori".to_string(),
                email: EMAIL.to_string(),
                roles: vec!["teacher".to_string(), "admin".to_string()],
                accessible_classroom_ids: vec![1, 2],
            },
            User {
                id: 3,
                kind: "Parent".to_string(),
                first_name: "Anne".to_string(),
                last_name: "Lovelace".to_string(),
                email: "parent@example.com".to_string(),
                roles: vec!["parent".to_string()],
                accessible_classroom_ids: vec![1],
            },
        ];
        let application = OnlineApplication {
            id: 1,
            school_id: SCHOOL_ID,
            kind: "online_application".to_string(),
            state: "submitted".to_string(),
            created_at: "2023-02-01T09:15:00.000000+0000".to_string(),
            fields: json!({"child_first_name": "Linus", "program": "Primary"})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        };

        Self {
            activities: vec![
                Activity {
                    id: 1,
                    author_id: 1,
                    classroom_id: 1,
                    child_ids: vec![1],
                    text: "Poured water without spilling.".to_string(),
                    date: "2023-02-01".to_string(),
                    photo_url: None,
                },
                Activity {
                    id: 2,
                    author_id: 1,
                    classroom_id: 2,
                    child_ids: vec![3],
                    text: "Counted to one hundred.".to_string(),
                    date: "2023-02-03".to_string(),
                    photo_url: Some("https://example.com/beads.jpg".to_string()),
                },
            ],
            children: children.into_iter().map(|child| (child.id, child)).collect(),
            classrooms: vec![
                Classroom {
                    id: 1,
                    name: "Sunflower".to_string(),
                    lesson_set_id: Some(1),
                    level: "3-6".to_string(),
                    active: true,
                },
                Classroom {
                    id: 2,
                    name: "Old Oak".to_string(),
                    lesson_set_id: Some(1),
                    level: "6-9".to_string(),
                    active: false,
                },
            ],
            conference_reports: vec![json!({
                "id": 1,
                "name": "Winter Conference",
                "child_id": 1,
                "created_at": "2023-01-15",
                "data": [{"name": "summary", "value": "Settling in well."}]
            })],
            events: vec![
                Event {
                    id: 1,
                    classroom_id: 1,
                    child_id: 1,
                    event_type: "sign_in".to_string(),
                    value: Some("Anne".to_string()),
                    time: "2023-02-01T08:05:00.000000+0000".to_string(),
                },
                Event {
                    id: 2,
                    classroom_id: 1,
                    child_id: 1,
                    event_type: "sign_out".to_string(),
                    value: None,
                    time: "2023-03-01T15:00:00.000000+0000".to_string(),
                },
            ],
            forms: [(
                1,
                json!({
                    "id": 1,
                    "form_template_id": 1,
                    "state": "submitted",
                    "child_id": 1,
                    "created_at": "2023-01-10T10:00:00.000000+0000",
                    "fields": {"allergies": "none", "nap": "yes"}
                }),
            )]
            .into_iter()
            .collect(),
            form_templates: vec![json!({
                "id": 1,
                "name": "Enrollment",
                "widgets": [{"type": "text", "label": "Allergies", "name": "allergies"}]
            })],
            lesson_sets: [(1, lesson_set())].into_iter().collect(),
            levels: vec![
                Level {
                    id: 1,
                    child_id: 1,
                    lesson_id: 30,
                    lesson_set_id: 1,
                    proficiency: 2,
                    date: "2023-01-20".to_string(),
                    planned: false,
                },
                Level {
                    id: 2,
                    child_id: 1,
                    lesson_id: 31,
                    lesson_set_id: 1,
                    proficiency: 1,
                    date: "2023-05-02".to_string(),
                    planned: true,
                },
            ],
            online_applications: [(application.id, application)].into_iter().collect(),
            schools: vec![School {
                id: SCHOOL_ID,
                name: "Casa dei Bambini".to_string(),
                phone: Some("555-0100".to_string()),
                address: None,
                kind: "School".to_string(),
                timezone: "UTC".to_string(),
            }],
            sessions: vec![Session {
                id: 1,
                name: "2022-2023".to_string(),
                start_date: "2022-09-01".to_string(),
                stop_date: "2023-06-30".to_string(),
                current: true,
                inactive: false,
            }],
            users: users.into_iter().map(|user| (user.id, user)).collect(),
        }
    }
}
