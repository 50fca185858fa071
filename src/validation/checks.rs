//! Validation checks for recipes.
//!
//! Each check takes a `&Recipe` and returns a `ValidationResult`.

use std::collections::HashSet;

use crate::recipe::Recipe;
use crate::types::Group;

use super::warning::{Diagnostic, ValidationResult};

/// Languages recipes are written in.
pub const KNOWN_LANGUAGES: &[&str] = &["en", "english", "sv", "swedish"];

/// Ingredients and instructions must have at least one line.
pub fn check_empty_environments(recipe: &Recipe) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (field, groups) in parted(recipe) {
        if groups.iter().all(|g| g.entries.is_empty()) {
            result.push(
                Diagnostic::error(
                    "rcml::validate::empty-environment",
                    format!("Recipe '{}' has no {}", recipe.name, field),
                )
                .in_field(field)
                .with_help(format!("List at least one line under `{}:`", field)),
            );
        }
    }

    result
}

/// Groups with no lines.
pub fn check_empty_groups(recipe: &Recipe) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (field, groups) in parted(recipe) {
        // An environment with nothing in it is reported as a whole.
        if groups.iter().all(|g| g.entries.is_empty()) {
            continue;
        }
        for (index, group) in groups.iter().enumerate() {
            if group.entries.is_empty() {
                result.push(
                    Diagnostic::warning(
                        "rcml::validate::empty-group",
                        format!("{} has no lines", describe(index, group)),
                    )
                    .in_field(field),
                );
            }
        }
    }

    result
}

/// The same part name used twice in one environment.
pub fn check_duplicate_parts(recipe: &Recipe) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (field, groups) in parted(recipe) {
        let mut seen = HashSet::new();
        for name in groups.iter().filter_map(|g| g.name.as_deref()) {
            if !seen.insert(name.to_lowercase()) {
                result.push(
                    Diagnostic::warning(
                        "rcml::validate::duplicate-part",
                        format!("Part '{}' appears more than once", name),
                    )
                    .in_field(field)
                    .with_help("Merge the parts or give them distinct names"),
                );
            }
        }
    }

    result
}

/// Changelog groups should be dated.
pub fn check_changelog_dates(recipe: &Recipe) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(changelog) = &recipe.changelog else {
        return result;
    };

    for (index, group) in changelog.iter().enumerate() {
        if group.date.is_none() {
            let what = match &group.entry {
                Some(entry) => format!("Entry '{}'", entry),
                None => format!("Change {}", index + 1),
            };
            result.push(
                Diagnostic::warning("rcml::validate::undated-change", format!("{} has no date", what))
                    .in_field("changelog")
                    .with_help("Add a `date: YYYY-MM-DD` line"),
            );
        }
    }

    result
}

/// The recipe language must be one we know.
pub fn check_language(recipe: &Recipe) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(language) = &recipe.language {
        if !KNOWN_LANGUAGES.contains(&language.to_lowercase().as_str()) {
            result.push(
                Diagnostic::warning(
                    "rcml::validate::unsupported-language",
                    format!("Language '{}' is not supported", language),
                )
                .in_field("language")
                .with_help(format!("Use one of: {}", KNOWN_LANGUAGES.join(", "))),
            );
        }
    }

    result
}

fn parted(recipe: &Recipe) -> [(&'static str, &[Group]); 2] {
    [
        ("ingredients", recipe.ingredients.as_slice()),
        ("instructions", recipe.instructions.as_slice()),
    ]
}

fn describe(index: usize, group: &Group) -> String {
    match &group.name {
        Some(name) => format!("Part '{}'", name),
        None => format!("Group {}", index + 1),
    }
}
