//! String ⇄ typed value coercion.
//!
//! Scalars are matched against an ordered list of recognizers; the first
//! one that both matches and produces a value wins, and plain text is the
//! fallback. Rendering is the `Display` form of [`Value`], which every
//! recognizer accepts back.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{RcmlError, Result};
use crate::types::{Duration, Value, ValueKind};

static TEMPERATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?P<degrees>\d+)\s*(degrees|c)$").unwrap());

// Both parts are optional, so the empty string is a zero duration.
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?P<hours>\d+)\s*(?:hours?|h))?\s*(?:(?P<minutes>\d+)\s*(?:minutes?|mins?|m))?$",
    )
    .unwrap()
});

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<year>\d{4})(?P<sep>-?)(?P<month>\d{1,2})-?(?P<day>\d{1,2})$").unwrap()
});

static BOOLEAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(yes|no|true|false)$").unwrap());

type Recognizer = fn(&str) -> Option<Value>;

/// Recognizers in priority order. `String` always matches and comes last.
const RECOGNIZERS: &[(ValueKind, Recognizer)] = &[
    (ValueKind::Temperature, recognize_temperature),
    (ValueKind::Duration, recognize_duration),
    (ValueKind::Date, recognize_date),
    (ValueKind::Boolean, recognize_boolean),
    (ValueKind::String, recognize_string),
];

/// Parse a scalar into the first value kind that accepts it.
pub fn parse_scalar(text: &str) -> Value {
    let text = text.trim();
    RECOGNIZERS
        .iter()
        .find_map(|(_, recognize)| recognize(text))
        .unwrap_or_else(|| Value::String(text.to_string()))
}

/// Render a value in the form `parse_scalar` reads back.
pub fn render_scalar(value: &Value) -> String {
    value.to_string()
}

/// Parse a scalar that must be of a specific kind.
pub fn coerce(text: &str, kind: ValueKind) -> Result<Value> {
    let trimmed = text.trim();
    RECOGNIZERS
        .iter()
        .find(|(k, _)| *k == kind)
        .and_then(|(_, recognize)| recognize(trimmed))
        .ok_or_else(|| RcmlError::TypeCoercion {
            line: None,
            text: trimmed.to_string(),
            expected: kind.name().to_string(),
        })
}

fn recognize_temperature(text: &str) -> Option<Value> {
    let caps = TEMPERATURE.captures(text)?;
    caps["degrees"].parse().ok().map(Value::Temperature)
}

fn recognize_duration(text: &str) -> Option<Value> {
    let caps = DURATION.captures(text)?;
    let part = |name: &str| -> Option<u32> {
        match caps.name(name) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    Duration::from_parts(part("hours")?, part("minutes")?).map(Value::Duration)
}

fn recognize_date(text: &str) -> Option<Value> {
    let caps = DATE.captures(text)?;
    let (month, day) = (&caps["month"], &caps["day"]);

    // Without separators the month and day must be two digits each.
    if caps["sep"].is_empty() && (month.len() != 2 || day.len() != 2) {
        return None;
    }

    NaiveDate::from_ymd_opt(
        caps["year"].parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    )
    .map(Value::Date)
}

fn recognize_boolean(text: &str) -> Option<Value> {
    if !BOOLEAN.is_match(text) {
        return None;
    }
    let lower = text.to_lowercase();
    Some(Value::Boolean(lower == "yes" || lower == "true"))
}

fn recognize_string(text: &str) -> Option<Value> {
    Some(Value::String(text.to_string()))
}
