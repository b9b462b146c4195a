//! Record types returned by the Transparent Classroom API.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::models::{Model, Widget};
use crate::value::Value;

json_model! {
    /// Result of signing in: the API token and the signed-in user.
    pub struct Auth {
        school_id: Option<i64> => "school_id",
        api_token: Option<String> => "api_token",
        push_tokens: Option<Vec<String>> => "push_tokens",
        push_enabled: Option<bool> => "push_enabled",
        user: Option<User> => "user",
    }
}

json_model! {
    /// A posted observation or photo about one or more children.
    pub struct Activity {
        id: Option<i64> => "id",
        author_id: Option<i64> => "author_id",
        classroom_id: Option<i64> => "classroom_id",
        text: Option<String> => "text",
        html: Option<String> => "html",
        date: Option<NaiveDate> => "date",
        staff_unprocessed: Option<bool> => "staff_unprocessed",
        photo_url: Option<String> => "photo_url",
        medium_photo_url: Option<String> => "medium_photo_url",
        large_photo_url: Option<String> => "large_photo_url",
        original_photo_url: Option<String> => "original_photo_url",
        created_at: Option<DateTime<FixedOffset>> => "created_at",
    }
}

json_model! {
    pub struct Child {
        id: Option<i64> => "id",
        first_name: Option<String> => "first_name",
        middle_name: Option<String> => "middle_name",
        last_name: Option<String> => "last_name",
        birth_date: Option<NaiveDate> => "birth_date",
        gender: Option<String> => "gender",
        profile_photo: Option<String> => "profile_photo",
        program: Option<String> => "program",
        ethnicity: Option<Vec<String>> => "ethnicity",
        household_income: Option<String> => "household_income",
        dominant_language: Option<String> => "dominant_language",
        grade: Option<String> => "grade",
        student_id: Option<String> => "student_id",
        hours_string: Option<String> => "hours_string",
        allergies: Option<String> => "allergies",
        notes: Option<String> => "notes",
        first_day: Option<NaiveDate> => "first_day",
        last_day: Option<NaiveDate> => "last_day",
        exit_notes: Option<String> => "exit_notes",
        exit_reason: Option<String> => "exit_reason",
        exit_survey_id: Option<i64> => "exit_survey_id",
        approved_adults_string: Option<String> => "approved_adults_string",
        emergency_contacts_string: Option<String> => "emergency_contacts_string",
        parent_ids: Option<Vec<i64>> => "parent_ids",
        classroom_ids: Option<Vec<i64>> => "classroom_ids",
    }
}

json_model! {
    pub struct Classroom {
        id: Option<i64> => "id",
        name: Option<String> => "name",
        lesson_set_id: Option<i64> => "lesson_set_id",
        level: Option<String> => "level",
        active: Option<bool> => "active",
    }
}

json_model! {
    /// A filled-in conference report; each answer is a widget.
    pub struct ConferenceReport {
        id: Option<i64> => "id",
        name: Option<String> => "name",
        child_id: Option<i64> => "child_id",
        widgets: Vec<Widget> => "widgets",
    }
}

json_model! {
    /// Attendance and sign-in/out events.
    pub struct Event {
        id: Option<i64> => "id",
        classroom_id: Option<i64> => "classroom_id",
        child_id: Option<i64> => "child_id",
        event_type: Option<String> => "event_type",
        value: Option<String> => "value",
        value2: Option<String> => "value2",
        created_by_id: Option<i64> => "created_by_id",
        created_by_name: Option<String> => "created_by_name",
        time: Option<DateTime<FixedOffset>> => "time",
    }
}

json_model! {
    /// A form response. `fields` holds one `{name, value}` widget per answer.
    pub struct Form {
        id: Option<i64> => "id",
        form_template_id: Option<i64> => "form_template_id",
        state: Option<String> => "state",
        child_id: Option<i64> => "child_id",
        created_at: Option<DateTime<FixedOffset>> => "created_at",
        fields: Vec<Widget> => "fields",
    }
}

json_model! {
    pub struct FormTemplate {
        id: Option<i64> => "id",
        name: Option<String> => "name",
        widgets: Vec<Widget> => "widgets",
    }
}

json_model! {
    /// A curriculum: proficiency scales plus a tree of areas, groups and
    /// lessons.
    pub struct LessonSet {
        id: Option<i64> => "id",
        name: Option<String> => "name",
        scales: Vec<Scale> => "scales",
        areas: Vec<Area> => "areas",
    }
}

json_model! {
    pub struct Scale {
        name: Option<String> => "name",
        values: Option<Vec<Value>> => "values",
    }
}

json_model! {
    pub struct Area {
        id: Option<i64> => "id",
        archetype_id: Option<i64> => "archetype_id",
        name: Option<String> => "name",
        kind: Option<String> => "type",
        description: Option<String> => "description",
        groups: Vec<Group> => "groups",
    }
}

json_model! {
    pub struct Group {
        id: Option<i64> => "id",
        archetype_id: Option<i64> => "archetype_id",
        name: Option<String> => "name",
        kind: Option<String> => "type",
        description: Option<String> => "description",
        subgroups: Vec<Group> => "subgroups",
        lessons: Vec<Lesson> => "lessons",
    }
}

json_model! {
    pub struct Lesson {
        id: Option<i64> => "id",
        archetype_id: Option<i64> => "archetype_id",
        name: Option<String> => "name",
        kind: Option<String> => "type",
        description: Option<String> => "description",
        photo: Option<String> => "photo",
        material: Option<String> => "material",
    }
}

json_model! {
    /// A child's recorded proficiency on one lesson.
    pub struct Level {
        id: Option<i64> => "id",
        child_id: Option<i64> => "child_id",
        lesson_id: Option<i64> => "lesson_id",
        proficiency: Option<i64> => "proficiency",
        date: Option<NaiveDate> => "date",
        planned: Option<bool> => "planned",
    }
}

json_model! {
    pub struct OnlineApplication {
        id: Option<i64> => "id",
        school_id: Option<i64> => "school_id",
        kind: Option<String> => "type",
        state: Option<String> => "state",
        fields: Vec<Widget> => "fields",
    }
}

json_model! {
    pub struct School {
        id: Option<i64> => "id",
        name: Option<String> => "name",
        phone: Option<String> => "phone",
        address: Option<String> => "address",
        kind: Option<String> => "type",
        timezone: Option<String> => "timezone",
    }
}

json_model! {
    pub struct Session {
        id: Option<i64> => "id",
        name: Option<String> => "name",
        start_date: Option<NaiveDate> => "start_date",
        stop_date: Option<NaiveDate> => "stop_date",
        children: Option<i64> => "children",
        current: Option<bool> => "current",
        inactive: Option<bool> => "inactive",
    }
}

json_model! {
    pub struct User {
        id: Option<i64> => "id",
        kind: Option<String> => "type",
        inactive: Option<bool> => "inactive",
        email: Option<String> => "email",
        first_name: Option<String> => "first_name",
        last_name: Option<String> => "last_name",
        roles: Option<Vec<String>> => "roles",
        accessible_classroom_ids: Option<Vec<i64>> => "accessible_classroom_ids",
        default_classroom_id: Option<i64> => "default_classroom_id",
        street: Option<String> => "street",
        postal_code: Option<String> => "postal_code",
        city: Option<String> => "city",
        state_province: Option<String> => "state_province",
        home_number: Option<String> => "home_number",
        mobile_number: Option<String> => "mobile_number",
        work_number: Option<String> => "work_number",
    }
}

macro_rules! impl_model {
    ($($name:ident),* $(,)?) => {
        $(
            impl Model for $name {
                fn id(&self) -> Option<i64> {
                    self.id
                }
            }
        )*
    };
}

impl_model!(
    Activity,
    Area,
    Child,
    Classroom,
    ConferenceReport,
    Event,
    Form,
    FormTemplate,
    Group,
    Lesson,
    LessonSet,
    Level,
    OnlineApplication,
    School,
    Session,
    User,
);
