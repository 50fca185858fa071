//! Grammar configuration for recipe files.
//!
//! A [`Grammar`] decides which top-level keys are scalars, which open an
//! environment block, which alternate spellings are accepted, and which
//! markers may appear inside each environment. It is validated once when
//! built and is immutable afterwards, so a single grammar can back any
//! number of independent parse sessions.
//!
//! # Usage
//!
//! ```ignore
//! use rcml::grammar::Grammar;
//!
//! let grammar = Grammar::recipe();
//! assert!(grammar.is_environment("ingredients"));
//! assert_eq!(grammar.resolve_alias("recipe"), Some("name"));
//! ```

mod config;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{RcmlError, Result};
use crate::types::MarkerKind;

pub use config::GrammarConfig;

/// What a top-level name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// A scalar key, by canonical name.
    Key(&'a str),
    /// An environment, by canonical name.
    Environment(&'a str),
}

/// A validated, immutable grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    keys: BTreeSet<String>,
    environments: BTreeMap<String, BTreeSet<MarkerKind>>,
    aliases: BTreeMap<String, String>,
}

impl Grammar {
    /// Validate a configuration and build a grammar from it.
    pub fn from_config(config: GrammarConfig) -> Result<Self> {
        validate_config(&config)?;
        Ok(Self::assemble(config))
    }

    /// Parse and validate a YAML grammar description.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Self::from_config(GrammarConfig::parse(content)?)
    }

    /// Load and validate a YAML grammar file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_config(GrammarConfig::load(path)?)
    }

    /// The built-in recipe grammar.
    pub fn recipe() -> Self {
        Self::assemble(GrammarConfig::recipe())
    }

    fn assemble(config: GrammarConfig) -> Self {
        let environments = config
            .environments
            .into_iter()
            .map(|(name, markers)| {
                let markers = markers
                    .iter()
                    .filter_map(|m| MarkerKind::from_name(m))
                    .collect();
                (name, markers)
            })
            .collect();

        Self {
            keys: config.keys.into_iter().collect(),
            environments,
            aliases: config.aliases,
        }
    }

    /// Whether `name` is a canonical scalar key.
    pub fn is_key(&self, name: &str) -> bool {
        self.keys.contains(name)
    }

    /// Whether `name` is a canonical environment name.
    pub fn is_environment(&self, name: &str) -> bool {
        self.environments.contains_key(name)
    }

    /// Whether `name` is an alternate spelling.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// The canonical name an alias stands for.
    pub fn resolve_alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Whether `key` is a marker allowed inside `environment`.
    pub fn is_valid_subkey(&self, environment: &str, key: &str) -> bool {
        match (self.environments.get(environment), MarkerKind::from_name(key)) {
            (Some(markers), Some(kind)) => markers.contains(&kind),
            _ => false,
        }
    }

    /// Fail with [`RcmlError::InvalidSubkey`] unless `kind` may appear inside
    /// `environment`.
    pub fn check_subkey(&self, environment: &str, kind: MarkerKind, line: Option<usize>) -> Result<()> {
        if self.is_valid_subkey(environment, kind.name()) {
            return Ok(());
        }

        let allowed: Vec<&str> = self.markers(environment).map(MarkerKind::name).collect();
        Err(RcmlError::InvalidSubkey {
            line,
            environment: environment.to_string(),
            key: kind.name().to_string(),
            help: Some(if allowed.is_empty() {
                format!("[{}] does not allow any markers", environment)
            } else {
                format!("Allowed markers: {}", allowed.join(", "))
            }),
        })
    }

    /// Markers allowed inside an environment.
    pub fn markers(&self, environment: &str) -> impl Iterator<Item = MarkerKind> + '_ {
        self.environments
            .get(environment)
            .into_iter()
            .flat_map(|markers| markers.iter().copied())
    }

    /// Resolve a name as written in a file: trims, lower-cases and follows
    /// aliases. Returns `None` for names the grammar does not know.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        let name = name.trim().to_lowercase();
        let canonical = self.aliases.get(&name).unwrap_or(&name);

        if let Some(key) = self.keys.get(canonical) {
            Some(Resolved::Key(key.as_str()))
        } else {
            self.environments
                .get_key_value(canonical)
                .map(|(env, _)| Resolved::Environment(env.as_str()))
        }
    }

    /// Canonical scalar keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::recipe()
    }
}

fn config_error(message: String, help: Option<&str>) -> RcmlError {
    RcmlError::Configuration {
        message,
        help: help.map(str::to_string),
    }
}

fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(config_error(format!("empty {} name", kind), None));
    }
    if name != name.trim() || name != name.to_lowercase() || name.contains(':') || name.starts_with('#') {
        return Err(config_error(
            format!("{} [{}] is not a valid name", kind, name),
            Some("Names are trimmed lower-case text without `:` or a leading `#`"),
        ));
    }
    if MarkerKind::from_name(name).is_some() {
        return Err(config_error(
            format!("{} [{}] clashes with a marker of the same name", kind, name),
            Some("part, optional, date and entry are reserved for markers"),
        ));
    }
    Ok(())
}

fn validate_config(config: &GrammarConfig) -> Result<()> {
    let mut keys = BTreeSet::new();
    for key in &config.keys {
        check_name("key", key)?;
        if !keys.insert(key.as_str()) {
            return Err(config_error(format!("key [{}] is declared twice", key), None));
        }
    }

    for (environment, markers) in &config.environments {
        check_name("environment", environment)?;
        if keys.contains(environment.as_str()) {
            return Err(config_error(
                format!("[{}] is declared both as a key and as an environment", environment),
                None,
            ));
        }

        let mut seen = BTreeSet::new();
        for marker in markers {
            let kind = MarkerKind::from_name(marker).ok_or_else(|| {
                config_error(
                    format!("environment [{}] allows unknown marker [{}]", environment, marker),
                    Some("Valid markers are part, optional, date and entry"),
                )
            })?;
            if !seen.insert(kind) {
                return Err(config_error(
                    format!("environment [{}] lists marker [{}] twice", environment, marker),
                    None,
                ));
            }
        }
    }

    for (alias, target) in &config.aliases {
        check_name("alias", alias)?;
        if keys.contains(alias.as_str()) || config.environments.contains_key(alias) {
            return Err(config_error(
                format!("alias [{}] shadows a canonical name", alias),
                None,
            ));
        }
        if !keys.contains(target.as_str()) && !config.environments.contains_key(target) {
            return Err(config_error(
                format!("alias [{}] points to unknown name [{}]", alias, target),
                Some("Alias targets must be declared under `keys` or `environments`"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> Result<Grammar> {
        Grammar::from_yaml(yaml)
    }

    #[test]
    fn test_builtin_recipe_grammar_is_valid() {
        let checked = Grammar::from_config(GrammarConfig::recipe()).unwrap();
        assert_eq!(checked, Grammar::recipe());
    }

    #[test]
    fn test_lookups() {
        let grammar = Grammar::recipe();

        assert!(grammar.is_key("name"));
        assert!(!grammar.is_key("ingredients"));
        assert!(grammar.is_environment("ingredients"));
        assert!(grammar.is_alias("recipe"));
        assert_eq!(grammar.resolve_alias("cooking time"), Some("cooking_time"));
        assert_eq!(grammar.resolve_alias("name"), None);
    }

    #[test]
    fn test_valid_subkeys() {
        let grammar = Grammar::recipe();

        assert!(grammar.is_valid_subkey("ingredients", "part"));
        assert!(grammar.is_valid_subkey("ingredients", "optional"));
        assert!(!grammar.is_valid_subkey("ingredients", "date"));
        assert!(grammar.is_valid_subkey("changelog", "date"));
        assert!(!grammar.is_valid_subkey("notes", "part"));
        assert!(!grammar.is_valid_subkey("unknown", "part"));
        assert_eq!(grammar.markers("notes").count(), 0);
    }

    #[test]
    fn test_check_subkey() {
        let grammar = Grammar::recipe();

        assert!(grammar.check_subkey("changelog", MarkerKind::Date, None).is_ok());
        assert!(matches!(
            grammar.check_subkey("ingredients", MarkerKind::Date, Some(4)),
            Err(RcmlError::InvalidSubkey { line: Some(4), ref help, .. })
                if help.as_deref() == Some("Allowed markers: part, optional")
        ));
    }

    #[test]
    fn test_resolve_is_case_insensitive_and_follows_aliases() {
        let grammar = Grammar::recipe();

        assert_eq!(grammar.resolve("Name"), Some(Resolved::Key("name")));
        assert_eq!(grammar.resolve(" RECIPE "), Some(Resolved::Key("name")));
        assert_eq!(grammar.resolve("Cooking Time"), Some(Resolved::Key("cooking_time")));
        assert_eq!(grammar.resolve("Steps"), Some(Resolved::Environment("instructions")));
        assert_eq!(grammar.resolve("banana"), None);
    }

    #[test]
    fn test_alias_to_unknown_target() {
        let result = config("keys: [name]\naliases:\n  title: heading\n");
        assert!(matches!(result, Err(RcmlError::Configuration { .. })));
    }

    #[test]
    fn test_alias_shadowing_canonical_name() {
        let result = config("keys: [name, title]\naliases:\n  title: name\n");
        assert!(matches!(result, Err(RcmlError::Configuration { .. })));
    }

    #[test]
    fn test_duplicate_alias() {
        let result = config("keys: [name, title]\naliases:\n  recipe: name\n  recipe: title\n");
        assert!(matches!(result, Err(RcmlError::Configuration { .. })));
    }

    #[test]
    fn test_unknown_marker() {
        let result = config("environments:\n  ingredients: [part, amount]\n");
        assert!(matches!(result, Err(RcmlError::Configuration { .. })));
    }

    #[test]
    fn test_repeated_marker() {
        let result = config("environments:\n  ingredients: [part, part]\n");
        assert!(matches!(result, Err(RcmlError::Configuration { .. })));
    }

    #[test]
    fn test_duplicate_key() {
        let result = config("keys: [name, name]\n");
        assert!(matches!(result, Err(RcmlError::Configuration { .. })));
    }

    #[test]
    fn test_key_and_environment_overlap() {
        let result = config("keys: [notes]\nenvironments:\n  notes: []\n");
        assert!(matches!(result, Err(RcmlError::Configuration { .. })));
    }

    #[test]
    fn test_marker_name_reserved() {
        let result = config("keys: [date]\n");
        assert!(matches!(result, Err(RcmlError::Configuration { .. })));
    }

    #[test]
    fn test_upper_case_name_rejected() {
        let result = config("keys: [Name]\n");
        assert!(matches!(result, Err(RcmlError::Configuration { .. })));
    }

    #[test]
    fn test_minimal_custom_grammar() {
        let grammar = config(
            "keys: [title]\nenvironments:\n  steps: [part]\naliases:\n  heading: title\n",
        )
        .unwrap();

        assert_eq!(grammar.resolve("Heading"), Some(Resolved::Key("title")));
        assert!(grammar.is_valid_subkey("steps", "part"));
        assert!(!grammar.is_valid_subkey("steps", "optional"));
    }
}
