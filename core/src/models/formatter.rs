//! Date formatting and JSON conversion for model payloads.
//!
//! # Design
//! The service speaks `YYYY-MM-DD` for dates and
//! `YYYY-MM-DDTHH:MM:SS.ffffff±HHMM` for datetimes. Output always uses the
//! canonical forms. Input is tolerant: microseconds may be missing, the
//! separator may be a space, and RFC 3339 (`Z`, `+00:00`) is accepted last.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::Number;

use crate::models::error::FormatError;
use crate::value::{Map, Value};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%z";

const DATETIME_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

pub struct Formatter;

impl Formatter {
    pub fn date_to_str(value: &NaiveDate) -> String {
        value.format(DATE_FORMAT).to_string()
    }

    pub fn datetime_to_str(value: &DateTime<FixedOffset>) -> String {
        value.format(DATETIME_FORMAT).to_string()
    }

    /// Accepts a `Date` as-is or a `YYYY-MM-DD` string.
    pub fn str_to_date(value: &Value) -> Result<NaiveDate, FormatError> {
        match value {
            Value::Date(date) => Ok(*date),
            Value::String(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| {
                FormatError::NotDate {
                    value: value.clone(),
                }
            }),
            _ => Err(FormatError::NotDate {
                value: value.clone(),
            }),
        }
    }

    /// Accepts a `DateTime` as-is or a datetime string in one of the
    /// tolerated shapes.
    pub fn str_to_datetime(value: &Value) -> Result<DateTime<FixedOffset>, FormatError> {
        let not_datetime = || FormatError::NotDateTime {
            value: value.clone(),
        };
        match value {
            Value::DateTime(datetime) => Ok(*datetime),
            Value::String(s) => DATETIME_INPUT_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(s, format).ok())
                .or_else(|| DateTime::parse_from_rfc3339(s).ok())
                .ok_or_else(not_datetime),
            _ => Err(not_datetime()),
        }
    }

    /// Convert one value to JSON. Dates become canonical strings; non-finite
    /// floats become `null`.
    pub fn jsonify_value(value: &Value) -> serde_json::Value {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(x) => Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(date) => serde_json::Value::String(Self::date_to_str(date)),
            Value::DateTime(datetime) => serde_json::Value::String(Self::datetime_to_str(datetime)),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::jsonify_value).collect())
            }
            Value::Map(map) => Self::jsonify(map),
        }
    }

    /// Convert a dictionary to a JSON object, recursing into nested values.
    pub fn jsonify(data: &Map) -> serde_json::Value {
        serde_json::Value::Object(
            data.iter()
                .map(|(key, value)| (key.clone(), Self::jsonify_value(value)))
                .collect(),
        )
    }
}
