//! Storage form of a recipe.
//!
//! A [`RecipeRecord`] is what gets persisted: every recipe field, plus the
//! values a store needs up front (a slug, publication and change dates and a
//! non-empty changelog).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RcmlError, Result};
use crate::types::{Duration, Group};

use super::Recipe;

/// Changelog entry used when a recipe has no changelog.
pub const FIRST_PUBLICATION: &str = "First publication";

/// A recipe ready for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub name: String,
    pub slug: String,
    pub makes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<Duration>,

    pub ingredients: Vec<Group>,
    pub instructions: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    pub changelog: Vec<Group>,

    /// Earliest changelog date.
    pub pub_date: NaiveDate,
    /// Latest changelog date.
    pub last_changed: NaiveDate,
}

impl RecipeRecord {
    /// Prepare a recipe for storage. `today` dates the default changelog
    /// and stands in for missing changelog dates.
    pub fn from_recipe(recipe: Recipe, today: NaiveDate) -> Self {
        let slug = match recipe.slug {
            Some(slug) if !slug.is_empty() => slug,
            _ => slugify(&recipe.name),
        };

        let changelog = match recipe.changelog {
            Some(changelog) => changelog,
            None => vec![Group::dated(today).with_entry(FIRST_PUBLICATION)],
        };

        let dates = changelog.iter().filter_map(|g| g.date);
        let (pub_date, last_changed) = match (dates.clone().min(), dates.max()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                debug!(slug = %slug, "no dates in changelog, using today");
                (today, today)
            }
        };

        Self {
            name: recipe.name,
            slug,
            makes: recipe.makes,
            language: recipe.language,
            uuid: recipe.uuid,
            description: recipe.description,
            temperature: recipe.temperature,
            cooking_time: recipe.cooking_time,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            notes: recipe.notes,
            tips: recipe.tips,
            changelog,
            pub_date,
            last_changed,
        }
    }

    /// Turn the record back into a recipe. The slug and changelog are kept.
    pub fn into_recipe(self) -> Recipe {
        Recipe {
            name: self.name,
            makes: self.makes,
            ingredients: self.ingredients,
            instructions: self.instructions,
            language: self.language,
            uuid: self.uuid,
            slug: Some(self.slug),
            description: self.description,
            temperature: self.temperature,
            cooking_time: self.cooking_time,
            notes: self.notes,
            tips: self.tips,
            changelog: Some(self.changelog),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| RcmlError::Storage {
            message: format!("Failed to serialize record: {}", e),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RcmlError::Storage {
            message: format!("Invalid recipe record: {}", e),
        })
    }
}

/// Lower-case slug: letters and digits, with every other run of characters
/// collapsed into a single `-`.
///
/// Accented Latin letters are folded to their base letters, so `Plättar`
/// becomes `plattar` and `Łódź` becomes `lodz`. Letters from other scripts
/// are kept as they are.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let folded = fold_latin(c);
        if folded.is_empty() && !c.is_alphanumeric() {
            pending_dash = true;
            continue;
        }

        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;

        if folded.is_empty() {
            slug.push(c);
        } else {
            slug.push_str(folded);
        }
    }

    slug
}

fn fold_latin(c: char) -> &'static str {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' | 'ș' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' | 'ț' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => "",
    }
}
