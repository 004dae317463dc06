//! Bound value model
//!
//! Every value a template placeholder can resolve to, together with its
//! textual SQL form. Timestamps render with a fixed `MM/DD/YYYY[ HH:MM:SS]`
//! pattern regardless of where the value came from; the time part is
//! included only when it is not midnight.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value bound to a template placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Null,
}

impl Value {
    /// Render the value as SQL statement text.
    ///
    /// No quoting is applied here; quoting is decided by the placeholder
    /// kind that the value is spliced into.
    pub fn sql_text(&self) -> String {
        match self {
            Value::Integer(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Text(text) => text.clone(),
            Value::Boolean(flag) => flag.to_string(),
            Value::DateTime(timestamp) => format_timestamp(timestamp),
            Value::Null => "NULL".to_string(),
        }
    }

    /// The timestamp payload, if this is a `DateTime` value.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(timestamp) => Some(*timestamp),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::DateTime(_) => "timestamp",
            Value::Null => "null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_text())
    }
}

/// Format a timestamp with the fixed statement pattern.
fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    if timestamp.hour() == 0 && timestamp.minute() == 0 && timestamp.second() == 0 {
        timestamp.format("%m/%d/%Y").to_string()
    } else {
        timestamp.format("%m/%d/%Y %H:%M:%S").to_string()
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Boolean(flag)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(timestamp: NaiveDateTime) -> Self {
        Value::DateTime(timestamp)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(timestamp: DateTime<Utc>) -> Self {
        Value::DateTime(timestamp.naive_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

// Bridge from the JSON value model. Arrays and objects have no SQL text
// form and map to NULL.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(flag) => Value::Boolean(flag),
            serde_json::Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    Value::Integer(integer)
                } else {
                    Value::Float(number.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(text) => Value::Text(text),
            _ => Value::Null,
        }
    }
}
