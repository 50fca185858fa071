//! Typed recipe model.
//!
//! A [`Recipe`] is the strongly-typed view of a grouped recipe document:
//! required fields are plain values, optional ones are `Option`s, and the
//! grouped environments are `Vec<Group>`.

mod record;

use serde::{Deserialize, Serialize};

use crate::error::{RcmlError, Result};
use crate::parser::parse_scalar;
use crate::types::{Duration, Field, Group, GroupedDocument, Value, ValueKind};

pub use record::{slugify, RecipeRecord, FIRST_PUBLICATION};

/// A recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub makes: String,
    pub ingredients: Vec<Group>,
    pub instructions: Vec<Group>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Oven temperature in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<Duration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<Vec<Group>>,
}

impl Recipe {
    /// A recipe with only the required fields set.
    pub fn new(name: impl Into<String>, makes: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            makes: makes.into(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            language: None,
            uuid: None,
            slug: None,
            description: None,
            temperature: None,
            cooking_time: None,
            notes: None,
            tips: None,
            changelog: None,
        }
    }

    /// Build a recipe from a grouped document.
    ///
    /// Text fields accept any scalar in its rendered form; `temperature` and
    /// `cooking_time` must hold values of their own kind. Fields the recipe
    /// does not know are ignored.
    pub fn from_grouped(document: &GroupedDocument) -> Result<Self> {
        let fields = Fields(document);

        Ok(Self {
            name: required("name", fields.text("name")?)?,
            makes: required("makes", fields.text("makes")?)?,
            ingredients: required("ingredients", fields.groups("ingredients")?)?,
            instructions: required("instructions", fields.groups("instructions")?)?,
            language: fields.text("language")?,
            uuid: fields.text("uuid")?,
            slug: fields.text("slug")?,
            description: fields.text("description")?,
            temperature: fields
                .typed("temperature", ValueKind::Temperature)?
                .and_then(|v| v.as_temperature()),
            cooking_time: fields
                .typed("cooking_time", ValueKind::Duration)?
                .and_then(|v| v.as_duration()),
            notes: fields.lines("notes")?,
            tips: fields.lines("tips")?,
            changelog: fields.groups("changelog")?,
        })
    }

    /// Convert to a grouped document in canonical field order.
    pub fn to_grouped(&self) -> GroupedDocument {
        let mut doc = GroupedDocument::new();

        doc.insert_scalar("name", parse_scalar(&self.name));
        doc.insert_scalar("makes", parse_scalar(&self.makes));

        let texts = [
            ("language", &self.language),
            ("uuid", &self.uuid),
            ("slug", &self.slug),
            ("description", &self.description),
        ];
        for (key, text) in texts {
            if let Some(text) = text {
                doc.insert_scalar(key, parse_scalar(text));
            }
        }
        if let Some(degrees) = self.temperature {
            doc.insert_scalar("temperature", Value::Temperature(degrees));
        }
        if let Some(time) = self.cooking_time {
            doc.insert_scalar("cooking_time", Value::Duration(time));
        }

        doc.insert_environment("ingredients", self.ingredients.clone());
        doc.insert_environment("instructions", self.instructions.clone());
        for (key, lines) in [("notes", &self.notes), ("tips", &self.tips)] {
            if let Some(lines) = lines {
                doc.insert_environment(key, lines_to_groups(lines));
            }
        }
        if let Some(changelog) = &self.changelog {
            doc.insert_environment("changelog", changelog.clone());
        }

        doc
    }

    /// All ingredient lines, across parts.
    pub fn ingredient_lines(&self) -> impl Iterator<Item = &str> {
        self.ingredients
            .iter()
            .flat_map(|g| g.entries.iter().map(String::as_str))
    }
}

fn lines_to_groups(lines: &[String]) -> Vec<Group> {
    if lines.is_empty() {
        Vec::new()
    } else {
        vec![Group::new().with_entries(lines.iter().cloned())]
    }
}

/// Typed field access over a grouped document.
struct Fields<'a>(&'a GroupedDocument);

impl Fields<'_> {
    fn text(&self, key: &str) -> Result<Option<String>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Field::Scalar(value)) => Ok(Some(value.to_string())),
            Some(Field::Environment(_)) => Err(wrong_shape(key, "text")),
        }
    }

    fn typed(&self, key: &str, kind: ValueKind) -> Result<Option<&Value>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Field::Scalar(value)) if value.kind() == kind => Ok(Some(value)),
            Some(Field::Scalar(value)) => Err(RcmlError::TypeCoercion {
                line: None,
                text: value.to_string(),
                expected: kind.name().to_string(),
            }),
            Some(Field::Environment(_)) => Err(wrong_shape(key, kind.name())),
        }
    }

    fn groups(&self, key: &str) -> Result<Option<Vec<Group>>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Field::Environment(groups)) => Ok(Some(groups.clone())),
            Some(Field::Scalar(value)) => Err(RcmlError::TypeCoercion {
                line: None,
                text: value.to_string(),
                expected: format!("[{}] environment", key),
            }),
        }
    }

    fn lines(&self, key: &str) -> Result<Option<Vec<String>>> {
        Ok(self
            .groups(key)?
            .map(|groups| groups.into_iter().flat_map(|g| g.entries).collect()))
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| RcmlError::MissingField {
        field: field.to_string(),
    })
}

fn wrong_shape(key: &str, expected: &str) -> RcmlError {
    RcmlError::TypeCoercion {
        line: None,
        text: format!("[{}] environment", key),
        expected: expected.to_string(),
    }
}
