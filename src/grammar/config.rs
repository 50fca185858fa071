//! Declarative grammar configuration (YAML).
//!
//! ```yaml
//! keys: [name, makes, temperature]
//! environments:
//!   ingredients: [part, optional]
//!   notes: []
//! aliases:
//!   recipe: name
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RcmlError, Result};

/// Raw grammar description as written in a configuration file.
///
/// This is unchecked data; build a [`super::Grammar`] from it to validate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrammarConfig {
    /// Scalar keys (`key: value`).
    pub keys: Vec<String>,

    /// Environment names mapped to the markers allowed inside them.
    #[serde(deserialize_with = "unique_map")]
    pub environments: BTreeMap<String, Vec<String>>,

    /// Alternate spellings mapped to their canonical key or environment.
    #[serde(deserialize_with = "unique_map")]
    pub aliases: BTreeMap<String, String>,
}

impl GrammarConfig {
    /// Load a grammar configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RcmlError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read grammar: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse a grammar configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| RcmlError::Configuration {
            message: format!("Invalid YAML: {}", e),
            help: Some("Expected top-level `keys`, `environments` and `aliases`".to_string()),
        })
    }

    /// The grammar for recipe files.
    pub fn recipe() -> Self {
        let list = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let environments = [
            ("ingredients", list(&["part", "optional"])),
            ("instructions", list(&["part", "optional"])),
            ("changelog", list(&["entry", "date"])),
            ("notes", vec![]),
            ("tips", vec![]),
        ]
        .into_iter()
        .map(|(name, markers)| (name.to_string(), markers))
        .collect();

        let aliases = [
            ("recipe", "name"),
            ("cookingtime", "cooking_time"),
            ("cooking time", "cooking_time"),
            ("cooking-time", "cooking_time"),
            ("ingredient", "ingredients"),
            ("steps", "instructions"),
        ]
        .into_iter()
        .map(|(alias, target)| (alias.to_string(), target.to_string()))
        .collect();

        Self {
            keys: list(&[
                "name",
                "uuid",
                "slug",
                "language",
                "makes",
                "cooking_time",
                "temperature",
                "description",
            ]),
            environments,
            aliases,
        }
    }
}

/// Deserialize a mapping, failing on a repeated name instead of keeping the
/// last one.
fn unique_map<'de, D, V>(deserializer: D) -> std::result::Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueMap<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueMap<V> {
        type Value = BTreeMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of names")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
            let mut map = BTreeMap::new();
            while let Some((name, value)) = access.next_entry::<String, V>()? {
                if map.contains_key(&name) {
                    return Err(de::Error::custom(format_args!("[{}] is listed twice", name)));
                }
                map.insert(name, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueMap(PhantomData))
}
