//! Groups ("parts") of an environment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named or unnamed subdivision of an environment.
///
/// Ingredients and instructions are split into parts (`part: Batter`), which
/// may be flagged optional. Changelog entries are split by `date:` and
/// `entry:` tags instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub entries: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

impl Group {
    /// An unnamed group with no entries or metadata.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn dated(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn tagged(entry: impl Into<String>) -> Self {
        Self {
            entry: Some(entry.into()),
            ..Self::default()
        }
    }

    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.extend(entries.into_iter().map(Into::into));
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Whether the group carries any metadata (name, flag, date, tag).
    pub fn has_metadata(&self) -> bool {
        self.name.is_some() || self.optional || self.date.is_some() || self.entry.is_some()
    }

    /// No entries and no metadata.
    pub fn is_pristine(&self) -> bool {
        self.entries.is_empty() && !self.has_metadata()
    }
}
