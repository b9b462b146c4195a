//! Request inputs for the client's list and write operations.
//!
//! # Design
//! Each query type turns itself into a binding map keyed by wire parameter
//! name. Unset options become nulls, which interface validation drops, so a
//! query never sends a filter the caller did not ask for. Booleans travel as
//! the wire strings `"true"` and `"false"`.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::models::{Attribute, Widget};
use crate::value::{Map, Value};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 50;

pub(crate) fn bindings<const N: usize>(pairs: [(&str, Value); N]) -> Map {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

pub(crate) fn wire_bool(flag: bool) -> Value {
    Value::String(flag.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Paging {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub(crate) fn extend(&self, map: &mut Map) {
        map.insert("page".to_string(), Value::from(self.page));
        map.insert("per_page".to_string(), Value::from(self.per_page));
    }

    pub(crate) fn bindings(&self) -> Map {
        let mut map = Map::new();
        self.extend(&mut map);
        map
    }
}

/// Filters for the activity feed. One of `child_id` or `classroom_id` must
/// be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityQuery {
    pub child_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub only_photos: bool,
    pub only_portfolio: bool,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub paging: Paging,
}

impl ActivityQuery {
    pub fn for_child(child_id: i64) -> Self {
        Self {
            child_id: Some(child_id),
            ..Self::default()
        }
    }

    pub fn for_classroom(classroom_id: i64) -> Self {
        Self {
            classroom_id: Some(classroom_id),
            ..Self::default()
        }
    }

    pub(crate) fn bindings(&self) -> Map {
        let mut map = bindings([
            ("child_id", Value::from(self.child_id)),
            ("classroom_id", Value::from(self.classroom_id)),
            ("only_photos", wire_bool(self.only_photos)),
            ("only_portfolio", wire_bool(self.only_portfolio)),
            ("date_start", Value::from(self.date_start)),
            ("date_end", Value::from(self.date_end)),
        ]);
        self.paging.extend(&mut map);
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChildrenQuery {
    pub classroom_id: Option<i64>,
    pub session_id: Option<i64>,
    pub only_current: bool,
    pub paging: Paging,
}

impl ChildrenQuery {
    pub(crate) fn bindings(&self) -> Map {
        let mut map = bindings([
            ("classroom_id", Value::from(self.classroom_id)),
            ("session_id", Value::from(self.session_id)),
            ("only_current", wire_bool(self.only_current)),
        ]);
        self.paging.extend(&mut map);
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassroomQuery {
    pub show_inactive: bool,
    pub paging: Paging,
}

impl ClassroomQuery {
    pub(crate) fn bindings(&self) -> Map {
        let mut map = bindings([("show_inactive", wire_bool(self.show_inactive))]);
        self.paging.extend(&mut map);
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConferenceReportQuery {
    pub child_id: Option<i64>,
    pub created_after: Option<NaiveDate>,
    pub created_before: Option<NaiveDate>,
    pub paging: Paging,
}

impl ConferenceReportQuery {
    pub(crate) fn bindings(&self) -> Map {
        let mut map = bindings([
            ("child_id", Value::from(self.child_id)),
            ("created_after", Value::from(self.created_after)),
            ("created_before", Value::from(self.created_before)),
        ]);
        self.paging.extend(&mut map);
        map
    }
}

/// A child and an inclusive date range; used by the event feed and the
/// by-date level listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildDateRange {
    pub child_id: i64,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub paging: Paging,
}

impl ChildDateRange {
    pub fn new(child_id: i64, date_start: NaiveDate, date_end: NaiveDate) -> Self {
        Self {
            child_id,
            date_start,
            date_end,
            paging: Paging::default(),
        }
    }

    pub(crate) fn bindings(&self) -> Map {
        let mut map = bindings([
            ("child_id", Value::from(self.child_id)),
            ("date_start", Value::from(self.date_start)),
            ("date_end", Value::from(self.date_end)),
        ]);
        self.paging.extend(&mut map);
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormQuery {
    pub form_template_id: Option<i64>,
    pub child_id: Option<i64>,
    pub created_before: Option<NaiveDate>,
    pub created_after: Option<NaiveDate>,
    pub paging: Paging,
}

impl FormQuery {
    pub(crate) fn bindings(&self) -> Map {
        let mut map = bindings([
            ("form_template_id", Value::from(self.form_template_id)),
            ("child_id", Value::from(self.child_id)),
            ("created_before", Value::from(self.created_before)),
            ("created_after", Value::from(self.created_after)),
        ]);
        self.paging.extend(&mut map);
        map
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelQuery {
    pub child_id: i64,
    pub lesson_set_id: Option<i64>,
    pub paging: Paging,
}

impl LevelQuery {
    pub fn new(child_id: i64) -> Self {
        Self {
            child_id,
            lesson_set_id: None,
            paging: Paging::default(),
        }
    }

    pub(crate) fn bindings(&self) -> Map {
        let mut map = bindings([
            ("child_id", Value::from(self.child_id)),
            ("lesson_set_id", Value::from(self.lesson_set_id)),
        ]);
        self.paging.extend(&mut map);
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnlineApplicationQuery {
    pub created_at: Option<DateTime<FixedOffset>>,
    pub paging: Paging,
}

impl OnlineApplicationQuery {
    pub(crate) fn bindings(&self) -> Map {
        let mut map = bindings([("created_at", Value::from(self.created_at))]);
        self.paging.extend(&mut map);
        map
    }
}

/// A new online application built from template answers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationSubmission {
    pub template_id: Option<i64>,
    pub fields: Vec<Widget>,
    pub silence_notifications: bool,
}

impl ApplicationSubmission {
    pub(crate) fn bindings(&self) -> Map {
        bindings([
            ("template_id", Value::from(self.template_id)),
            ("fields", self.fields.to_value()),
            ("silence_notifications", wire_bool(self.silence_notifications)),
        ])
    }
}

/// User listing filters. `roles` are matched against the service's role
/// names (`teacher`, `parent`, `admin`, `billing_manager`,
/// `family_member`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserQuery {
    pub classroom_id: Option<i64>,
    pub roles: Vec<String>,
    pub paging: Paging,
}

impl UserQuery {
    pub(crate) fn bindings(&self) -> Map {
        let roles = if self.roles.is_empty() {
            Value::Null
        } else {
            Value::from(self.roles.clone())
        };
        let mut map = bindings([
            ("classroom_id", Value::from(self.classroom_id)),
            ("roles[]", roles),
        ]);
        self.paging.extend(&mut map);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_defaults_to_first_page_of_fifty() {
        let paging = Paging::default();
        assert_eq!((paging.page, paging.per_page), (1, 50));
        assert_eq!(paging.bindings().get("per_page"), Some(&Value::from(50u32)));
    }

    #[test]
    fn activity_query_encodes_flags_as_strings() {
        let map = ActivityQuery::for_child(3).bindings();
        assert_eq!(map.get("child_id"), Some(&Value::from(3i64)));
        assert_eq!(map.get("classroom_id"), Some(&Value::Null));
        assert_eq!(map.get("only_photos"), Some(&Value::from("false")));
    }

    #[test]
    fn empty_roles_are_unset() {
        assert_eq!(UserQuery::default().bindings().get("roles[]"), Some(&Value::Null));
        let query = UserQuery {
            roles: vec!["teacher".into()],
            ..UserQuery::default()
        };
        assert_eq!(
            query.bindings().get("roles[]"),
            Some(&Value::from(vec![Value::from("teacher")]))
        );
    }

    #[test]
    fn submission_carries_widget_maps() {
        let submission = ApplicationSubmission {
            template_id: Some(8),
            fields: vec![Widget::answer("first_name", "Ada")],
            silence_notifications: true,
        };
        let map = submission.bindings();
        assert_eq!(map.get("silence_notifications"), Some(&Value::from("true")));
        assert!(matches!(map.get("fields"), Some(Value::List(items)) if items.len() == 1));
    }
}
