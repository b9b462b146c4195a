//! Inbound payload deserialization.
//!
//! # Design
//! A `Deserializer` names its output model and may reshape the raw payload
//! with `prepare` before `JsonModel::from_dict` runs. Every `prepare` here is
//! total (sparse payloads never fail) and idempotent (preparing an already
//! prepared payload changes nothing), so payloads can be re-fed safely.

use crate::models::{
    Activity, Area, Attribute, Auth, Child, Classroom, ConferenceReport, Event, Form,
    FormTemplate, Group, JsonModel, Lesson, LessonSet, Level, ModelError, OnlineApplication,
    School, Session, User, Widget,
};
use crate::value::{Map, Value};

pub trait Deserializer {
    type Output: JsonModel;

    /// Reshape a raw payload into the model's dictionary form.
    fn prepare(&self, data: Map) -> Map {
        data
    }

    fn deserialize(&self, data: Map) -> Result<Self::Output, ModelError> {
        Self::Output::from_dict(self.prepare(data))
    }

    fn batch(&self, data: Vec<Map>) -> Result<Vec<Self::Output>, ModelError> {
        data.into_iter().map(|item| self.deserialize(item)).collect()
    }

    /// Deserialize one object payload.
    fn deserialize_value(&self, value: Value) -> Result<Self::Output, ModelError> {
        match value {
            Value::Map(map) => self.deserialize(map),
            other => Err(ModelError::unexpected("dict", other)),
        }
    }

    /// Deserialize a list payload; a single object counts as a list of one.
    fn batch_value(&self, value: Value) -> Result<Vec<Self::Output>, ModelError> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| self.deserialize_value(item))
                .collect(),
            Value::Map(map) => Ok(vec![self.deserialize(map)?]),
            other => Err(ModelError::unexpected("list", other)),
        }
    }
}

macro_rules! plain_deserializers {
    ($($name:ident => $model:ty),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl Deserializer for $name {
                type Output = $model;
            }
        )*
    };
}

plain_deserializers! {
    ActivityDeserializer => Activity,
    ChildDeserializer => Child,
    ClassroomDeserializer => Classroom,
    EventDeserializer => Event,
    LevelDeserializer => Level,
    SchoolDeserializer => School,
    SessionDeserializer => Session,
    UserDeserializer => User,
    WidgetDeserializer => Widget,
    FormTemplateDeserializer => FormTemplate,
}

/// Run `deserializer.prepare` over every object in a list value.
fn prepare_each<D: Deserializer>(deserializer: &D, value: Value) -> Value {
    match value {
        Value::List(items) => Value::List(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Map(map) => Value::Map(deserializer.prepare(map)),
                    other => other,
                })
                .collect(),
        ),
        Value::Map(map) => Value::List(vec![Value::Map(deserializer.prepare(map))]),
        Value::Null => Value::List(Vec::new()),
        other => other,
    }
}

/// `{question: answer}` becomes `[{name: question, value: answer}]`.
fn answers_to_widgets(value: Option<Value>) -> Value {
    match value {
        Some(Value::Map(answers)) => Value::List(
            answers
                .into_iter()
                .map(|(name, value)| Widget::answer(name, value).to_value())
                .collect(),
        ),
        Some(Value::Null) | None => Value::List(Vec::new()),
        Some(other) => other,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormDeserializer;

impl Deserializer for FormDeserializer {
    type Output = Form;

    fn prepare(&self, mut data: Map) -> Map {
        let fields = answers_to_widgets(data.shift_remove("fields"));
        data.insert("fields".to_string(), fields);
        data
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OnlineApplicationDeserializer;

impl Deserializer for OnlineApplicationDeserializer {
    type Output = OnlineApplication;

    fn prepare(&self, mut data: Map) -> Map {
        let fields = answers_to_widgets(data.shift_remove("fields"));
        data.insert("fields".to_string(), fields);
        data
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConferenceReportDeserializer;

impl Deserializer for ConferenceReportDeserializer {
    type Output = ConferenceReport;

    fn prepare(&self, mut data: Map) -> Map {
        let widgets = data
            .shift_remove("data")
            .or_else(|| data.shift_remove("widgets"))
            .unwrap_or(Value::Null);

        let mut prepared = Map::new();
        for key in ["id", "name", "child_id"] {
            prepared.insert(key.to_string(), data.shift_remove(key).unwrap_or(Value::Null));
        }
        prepared.insert("widgets".to_string(), prepare_each(&WidgetDeserializer, widgets));
        prepared
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LessonDeserializer;

impl Deserializer for LessonDeserializer {
    type Output = Lesson;

    fn prepare(&self, mut data: Map) -> Map {
        for (from, to) in [("profile_photo", "photo"), ("material_name", "material")] {
            if let Some(value) = data.shift_remove(from) {
                data.insert(to.to_string(), value);
            }
        }
        data.shift_remove("children");
        data
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GroupDeserializer;

impl Deserializer for GroupDeserializer {
    type Output = Group;

    fn prepare(&self, mut data: Map) -> Map {
        let subgroups = data
            .shift_remove("children")
            .or_else(|| data.shift_remove("subgroups"))
            .unwrap_or(Value::Null);
        let lessons = data.shift_remove("lessons").unwrap_or(Value::Null);
        data.insert("subgroups".to_string(), prepare_each(self, subgroups));
        data.insert(
            "lessons".to_string(),
            prepare_each(&LessonDeserializer, lessons),
        );
        data
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AreaDeserializer;

impl Deserializer for AreaDeserializer {
    type Output = Area;

    fn prepare(&self, mut data: Map) -> Map {
        let groups = data
            .shift_remove("children")
            .or_else(|| data.shift_remove("groups"))
            .unwrap_or(Value::Null);
        data.insert("groups".to_string(), prepare_each(&GroupDeserializer, groups));
        data
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LessonSetDeserializer;

impl Deserializer for LessonSetDeserializer {
    type Output = LessonSet;

    fn prepare(&self, mut data: Map) -> Map {
        let scales = match data.shift_remove("scales") {
            Some(Value::Map(scales)) => Value::List(
                scales
                    .into_iter()
                    .map(|(name, values)| {
                        let mut scale = Map::new();
                        scale.insert("name".to_string(), Value::String(name));
                        scale.insert("values".to_string(), values);
                        Value::Map(scale)
                    })
                    .collect(),
            ),
            Some(Value::Null) | None => Value::List(Vec::new()),
            Some(other) => other,
        };
        let areas = data
            .shift_remove("children")
            .or_else(|| data.shift_remove("areas"))
            .unwrap_or(Value::Null);
        data.insert("scales".to_string(), scales);
        data.insert("areas".to_string(), prepare_each(&AreaDeserializer, areas));
        data
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthDeserializer;

impl AuthDeserializer {
    /// Keys that belong to the session rather than to the signed-in user.
    pub const AUTH_KEYS: [&'static str; 4] =
        ["school_id", "api_token", "push_tokens", "push_enabled"];
}

impl Deserializer for AuthDeserializer {
    type Output = Auth;

    fn prepare(&self, data: Map) -> Map {
        let mut auth = Map::new();
        let mut user = Map::new();
        for (key, value) in data {
            if Self::AUTH_KEYS.contains(&key.as_str()) {
                auth.insert(key, value);
            } else if key == "user" {
                if let Value::Map(existing) = value {
                    user.extend(existing);
                }
            } else {
                user.insert(key, value);
            }
        }
        auth.insert("user".to_string(), Value::Map(user));
        auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Model;
    use chrono::NaiveDate;
    use serde_json::json;

    fn map(value: serde_json::Value) -> Map {
        match Value::from(value) {
            Value::Map(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    fn assert_idempotent<D: Deserializer>(deserializer: &D, data: Map) {
        let once = deserializer.prepare(data);
        let twice = deserializer.prepare(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn plain_deserializers_map_attributes() {
        let child = ChildDeserializer
            .deserialize(map(json!({
                "id": 1,
                "first_name": "Hello",
                "birth_date": "2018-07-01",
                "ethnicity": "White",
                "profile_photo": null,
                "parent_ids": [1, 2],
            })))
            .unwrap();
        assert_eq!(child.id(), Some(1));
        assert_eq!(child.birth_date, NaiveDate::from_ymd_opt(2018, 7, 1));
        assert_eq!(child.ethnicity, Some(vec!["White".to_string()]));
        assert_eq!(child.profile_photo, None);
        assert_eq!(child.parent_ids, Some(vec![1, 2]));
    }

    #[test]
    fn batch_value_accepts_lists_and_single_objects() {
        let users = UserDeserializer
            .batch_value(Value::from(json!([{"id": 1}, {"id": 2, "roles": ["teacher"]}])))
            .unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].roles, Some(vec!["teacher".to_string()]));

        let single = UserDeserializer
            .batch_value(Value::from(json!({"id": 3})))
            .unwrap();
        assert_eq!(single[0].id(), Some(3));

        assert!(UserDeserializer.batch_value(Value::from(3)).is_err());
    }

    #[test]
    fn auth_splits_session_and_user_keys() {
        let data = map(json!({
            "type": "user",
            "id": 1,
            "first_name": "Hello",
            "email": "hello.world@test.edu",
            "roles": ["teacher"],
            "school_id": 1,
            "api_token": "foo",
            "push_tokens": [],
            "push_enabled": false,
        }));
        let auth = AuthDeserializer.deserialize(data.clone()).unwrap();
        assert_eq!(auth.api_token.as_deref(), Some("foo"));
        assert_eq!(auth.school_id, Some(1));
        assert_eq!(auth.push_enabled, Some(false));
        let user = auth.user.unwrap();
        assert_eq!(user.id(), Some(1));
        assert_eq!(user.kind.as_deref(), Some("user"));
        assert_eq!(user.email.as_deref(), Some("hello.world@test.edu"));

        assert_idempotent(&AuthDeserializer, data);
    }

    #[test]
    fn form_answers_become_widgets() {
        let data = map(json!({
            "id": 1,
            "form_template_id": 1,
            "state": "submitted",
            "created_at": "2023-01-01T10:00:00.000000+0000",
            "fields": {
                "Student Name.first": "Hello",
                "Parent Name": "Hello, World!",
            },
        }));
        let form = FormDeserializer.deserialize(data.clone()).unwrap();
        assert_eq!(form.fields.len(), 2);
        assert!(form.fields.contains(&Widget::answer("Parent Name", "Hello, World!")));
        assert!(form.created_at.is_some());

        assert_idempotent(&FormDeserializer, data);
        assert!(FormDeserializer
            .deserialize(map(json!({"id": 2})))
            .unwrap()
            .fields
            .is_empty());
    }

    #[test]
    fn online_application_answers_become_widgets() {
        let data = map(json!({
            "id": 1,
            "school_id": 1,
            "state": "accepted",
            "fields": {"program": "Elementary", "session_id": 1},
        }));
        let application = OnlineApplicationDeserializer.deserialize(data.clone()).unwrap();
        assert_eq!(application.fields.len(), 2);
        assert_eq!(
            application.fields[1].get("value"),
            Some(&Value::from(1))
        );
        assert_idempotent(&OnlineApplicationDeserializer, data);
    }

    #[test]
    fn answers_keep_the_order_they_arrived_in() {
        let mut answers = Map::new();
        answers.insert("Zeta question".to_string(), Value::from("last letter"));
        answers.insert("Alpha question".to_string(), Value::from("first letter"));
        let mut data = Map::new();
        data.insert("id".to_string(), Value::from(3));
        data.insert("fields".to_string(), Value::Map(answers));

        let form = FormDeserializer.deserialize(data).unwrap();
        let names: Vec<_> = form.fields.iter().map(|w| w.get("name").cloned()).collect();
        assert_eq!(
            names,
            [
                Some(Value::from("Zeta question")),
                Some(Value::from("Alpha question")),
            ]
        );

        let application = OnlineApplicationDeserializer
            .deserialize(map(json!({"fields": {"zip": "12345", "address": "Main St"}})))
            .unwrap();
        assert_eq!(application.fields[0].get("name"), Some(&Value::from("zip")));
        assert_eq!(application.fields[1].get("name"), Some(&Value::from("address")));
    }

    #[test]
    fn conference_report_moves_data_to_widgets() {
        let data = map(json!({
            "id": 1,
            "name": "Hello",
            "child_id": 1,
            "extra": true,
            "data": [{"label": "Math", "value": "good"}],
        }));
        let report = ConferenceReportDeserializer.deserialize(data.clone()).unwrap();
        assert_eq!(report.widgets.len(), 1);
        assert_eq!(report.widgets[0].get("label"), Some(&Value::from("Math")));

        let prepared = ConferenceReportDeserializer.prepare(data.clone());
        assert!(!prepared.contains_key("extra"));
        assert_idempotent(&ConferenceReportDeserializer, data);
    }

    #[test]
    fn lesson_renames_wire_keys() {
        let data = map(json!({
            "id": 5,
            "name": "Pink Tower",
            "profile_photo": "tower.png",
            "material_name": "Tower",
            "children": [],
        }));
        let lesson = LessonDeserializer.deserialize(data.clone()).unwrap();
        assert_eq!(lesson.photo.as_deref(), Some("tower.png"));
        assert_eq!(lesson.material.as_deref(), Some("Tower"));
        assert_idempotent(&LessonDeserializer, data);
    }

    fn lesson_set_payload() -> Map {
        map(json!({
            "id": 1,
            "name": "Primary",
            "scales": {"Proficiency": ["Presented", "Practicing", "Mastered"]},
            "children": [{
                "id": 10,
                "type": "area",
                "name": "Sensorial",
                "children": [{
                    "id": 20,
                    "type": "group",
                    "name": "Visual",
                    "children": [{"id": 21, "type": "group", "children": []}],
                    "lessons": [{"id": 30, "type": "lesson", "material_name": "Cylinders"}],
                }],
            }],
        }))
    }

    #[test]
    fn lesson_set_builds_the_curriculum_tree() {
        let lesson_set = LessonSetDeserializer.deserialize(lesson_set_payload()).unwrap();
        assert_eq!(lesson_set.scales.len(), 1);
        assert_eq!(lesson_set.scales[0].name.as_deref(), Some("Proficiency"));
        assert_eq!(lesson_set.scales[0].values.as_ref().map(Vec::len), Some(3));

        let area = &lesson_set.areas[0];
        assert_eq!(area.kind.as_deref(), Some("area"));
        let group = &area.groups[0];
        assert_eq!(group.id(), Some(20));
        assert_eq!(group.subgroups[0].id(), Some(21));
        assert_eq!(group.lessons[0].material.as_deref(), Some("Cylinders"));
    }

    #[test]
    fn curriculum_prepares_are_idempotent_and_total() {
        assert_idempotent(&LessonSetDeserializer, lesson_set_payload());
        assert_idempotent(&AreaDeserializer, map(json!({"id": 1})));
        assert_idempotent(&GroupDeserializer, map(json!({"id": 1, "children": [{"id": 2}]})));

        let sparse = LessonSetDeserializer.deserialize(map(json!({"id": 2}))).unwrap();
        assert!(sparse.areas.is_empty());
        assert!(sparse.scales.is_empty());
        assert!(GroupDeserializer.deserialize(Map::new()).is_ok());
    }

    #[test]
    fn form_template_widgets_pass_through() {
        let template = FormTemplateDeserializer
            .deserialize(map(json!({
                "id": 1,
                "name": "Enrollment",
                "widgets": [{"type": "text", "label": "Name", "required": true}],
            })))
            .unwrap();
        assert_eq!(template.widgets[0].get("required"), Some(&Value::from(true)));
    }
}
