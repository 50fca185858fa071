//! Validation for recipes.
//!
//! Parsing guarantees a recipe is well-formed; validation reports things
//! that are legal but likely mistakes. Used by `rcml check`.

mod checks;
mod warning;

pub use checks::KNOWN_LANGUAGES;
pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::recipe::Recipe;

/// Run all validation checks against a recipe.
pub fn validate_recipe(recipe: &Recipe) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_empty_environments(recipe));
    result.merge(checks::check_empty_groups(recipe));
    result.merge(checks::check_duplicate_parts(recipe));
    result.merge(checks::check_changelog_dates(recipe));
    result.merge(checks::check_language(recipe));

    result
}
