//! Typed scalar values.
//!
//! Every scalar in a recipe file is stored as a [`Value`]. The `Display`
//! implementations produce the exact human form that the coercion layer
//! reads back, so `value.to_string()` is always re-parseable.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for rendering and in error messages.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A duration with minute precision, e.g. `1 hour 30 minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration {
    minutes: u32,
}

impl Duration {
    pub const ZERO: Self = Self { minutes: 0 };

    /// Create a duration from a total number of minutes.
    pub const fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Create a duration from hours and minutes, `None` on overflow.
    pub fn from_parts(hours: u32, minutes: u32) -> Option<Self> {
        hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .map(Self::from_minutes)
    }

    /// Total length in minutes.
    pub fn total_minutes(self) -> u32 {
        self.minutes
    }

    /// Whole hours.
    pub fn hours(self) -> u32 {
        self.minutes / 60
    }

    /// Minutes past the last whole hour.
    pub fn minutes(self) -> u32 {
        self.minutes % 60
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes) = (self.hours(), self.minutes());
        let unit = |n: u32, singular: &str| {
            if n == 1 {
                format!("{} {}", n, singular)
            } else {
                format!("{} {}s", n, singular)
            }
        };

        match (hours, minutes) {
            (0, m) => write!(f, "{}", unit(m, "minute")),
            (h, 0) => write!(f, "{}", unit(h, "hour")),
            (h, m) => write!(f, "{} {}", unit(h, "hour"), unit(m, "minute")),
        }
    }
}

/// The kind of a [`Value`], used when a specific kind is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Duration,
    Temperature,
    Date,
    Boolean,
    String,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Duration => "duration",
            ValueKind::Temperature => "temperature",
            ValueKind::Date => "date",
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar value after type coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Duration(Duration),
    /// Oven temperature in degrees.
    Temperature(i64),
    Date(NaiveDate),
    Boolean(bool),
    String(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Duration(_) => ValueKind::Duration,
            Value::Temperature(_) => ValueKind::Temperature,
            Value::Date(_) => ValueKind::Date,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_temperature(&self) -> Option<i64> {
        match self {
            Value::Temperature(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Duration(d) => write!(f, "{}", d),
            Value::Temperature(t) => write!(f, "{} degrees", t),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Boolean(true) => f.write_str("yes"),
            Value::Boolean(false) => f.write_str("no"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_display() {
        assert_eq!(Duration::from_minutes(0).to_string(), "0 minutes");
        assert_eq!(Duration::from_minutes(1).to_string(), "1 minute");
        assert_eq!(Duration::from_minutes(45).to_string(), "45 minutes");
        assert_eq!(Duration::from_minutes(60).to_string(), "1 hour");
        assert_eq!(Duration::from_minutes(120).to_string(), "2 hours");
        assert_eq!(Duration::from_minutes(90).to_string(), "1 hour 30 minutes");
        assert_eq!(Duration::from_minutes(121).to_string(), "2 hours 1 minute");
    }

    #[test]
    fn test_duration_from_parts_overflow() {
        assert_eq!(Duration::from_parts(2, 5), Some(Duration::from_minutes(125)));
        assert_eq!(Duration::from_parts(u32::MAX, 0), None);
    }

    #[test]
    fn test_value_display() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();

        assert_eq!(Value::Temperature(180).to_string(), "180 degrees");
        assert_eq!(Value::Date(date).to_string(), "2021-03-07");
        assert_eq!(Value::Boolean(true).to_string(), "yes");
        assert_eq!(Value::Boolean(false).to_string(), "no");
        assert_eq!(Value::from("Pancakes").to_string(), "Pancakes");
    }

    #[test]
    fn test_value_json_shape() {
        let json = serde_json::to_value(Value::Temperature(200)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "temperature", "value": 200 }));

        let json = serde_json::to_value(Value::Duration(Duration::from_minutes(75))).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "duration", "value": 75 }));
    }
}
