//! Parsed documents.
//!
//! A [`Document`] is an ordered mapping from canonical field name to a
//! [`Field`]. The parser produces documents whose environments hold a flat
//! list of [`Entry`] values; the transformer turns those into
//! [`GroupedDocument`]s whose environments hold [`Group`]s.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::group::Group;
use super::value::{Value, DATE_FORMAT};

/// The structural markers that may appear inside an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerKind {
    Part,
    Optional,
    Date,
    Entry,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 4] = [
        MarkerKind::Part,
        MarkerKind::Optional,
        MarkerKind::Date,
        MarkerKind::Entry,
    ];

    /// The key used for this marker in recipe text.
    pub fn name(self) -> &'static str {
        match self {
            MarkerKind::Part => "part",
            MarkerKind::Optional => "optional",
            MarkerKind::Date => "date",
            MarkerKind::Entry => "entry",
        }
    }

    /// Look up a marker by its (already lower-cased) key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A marker line inside an environment, e.g. `part: Batter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "marker", content = "value", rename_all = "snake_case")]
pub enum Marker {
    Part(String),
    Optional(bool),
    Date(NaiveDate),
    Entry(String),
}

impl Marker {
    pub fn kind(&self) -> MarkerKind {
        match self {
            Marker::Part(_) => MarkerKind::Part,
            Marker::Optional(_) => MarkerKind::Optional,
            Marker::Date(_) => MarkerKind::Date,
            Marker::Entry(_) => MarkerKind::Entry,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Part(name) => write!(f, "part: {}", name),
            Marker::Optional(true) => f.write_str("optional: yes"),
            Marker::Optional(false) => f.write_str("optional: no"),
            Marker::Date(date) => write!(f, "date: {}", date.format(DATE_FORMAT)),
            Marker::Entry(tag) => write!(f, "entry: {}", tag),
        }
    }
}

/// One line of an environment before grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    /// A plain content line.
    Line(String),
    /// A structural marker.
    Marker(Marker),
}

impl Entry {
    pub fn line(text: impl Into<String>) -> Self {
        Entry::Line(text.into())
    }
}

/// The value of a document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Field<E> {
    /// A `key: value` assignment.
    Scalar(Value),
    /// A `key:` block holding entries (flat) or groups.
    Environment(Vec<E>),
}

impl<E> Field<E> {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Field::Scalar(value) => Some(value),
            Field::Environment(_) => None,
        }
    }

    pub fn as_environment(&self) -> Option<&[E]> {
        match self {
            Field::Scalar(_) => None,
            Field::Environment(items) => Some(items),
        }
    }
}

/// An ordered mapping of canonical field names to fields.
///
/// Insertion order is preserved. Inserting an existing key replaces its
/// value without moving it. Two documents are equal only when their fields
/// are equal in the same order.
#[derive(Debug, Clone)]
pub struct Document<E = Entry> {
    fields: IndexMap<String, Field<E>>,
}

/// A document whose environments have been grouped into parts.
pub type GroupedDocument = Document<Group>;

impl<E> Default for Document<E> {
    fn default() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }
}

impl<E: PartialEq> PartialEq for Document<E> {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len() && self.fields.iter().eq(other.fields.iter())
    }
}

impl<E: Eq> Eq for Document<E> {}

impl<E> Document<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value for that key.
    pub fn insert(&mut self, key: impl Into<String>, field: Field<E>) -> Option<Field<E>> {
        self.fields.insert(key.into(), field)
    }

    pub fn insert_scalar(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.insert(key, Field::Scalar(value.into()));
    }

    pub fn insert_environment(&mut self, key: impl Into<String>, items: Vec<E>) {
        self.insert(key, Field::Environment(items));
    }

    pub fn get(&self, key: &str) -> Option<&Field<E>> {
        self.fields.get(key)
    }

    pub fn scalar(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(Field::as_scalar)
    }

    pub fn environment(&self, key: &str) -> Option<&[E]> {
        self.get(key).and_then(Field::as_environment)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field<E>)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<E> IntoIterator for Document<E> {
    type Item = (String, Field<E>);
    type IntoIter = indexmap::map::IntoIter<String, Field<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<E> FromIterator<(String, Field<E>)> for Document<E> {
    fn from_iter<I: IntoIterator<Item = (String, Field<E>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<E: Serialize> Serialize for Document<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
