//! `rcml import`: JSON recipe record back to recipe markup.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::read_source;
use crate::error::{RcmlError, Result};
use crate::grammar::Grammar;
use crate::output::{display_path, Printer};
use crate::recipe::RecipeRecord;
use crate::render::TextRenderer;

/// Turn a JSON recipe record back into recipe markup
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON record produced by `rcml export --format record`
    pub file: PathBuf,

    /// Write to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Recipe markup for a JSON record.
///
/// Fails instead of writing text that `grammar` would read back as a
/// different recipe.
pub fn import_record(json: &str, grammar: &Grammar) -> Result<String> {
    let recipe = RecipeRecord::from_json(json)?.into_recipe();
    TextRenderer::new(grammar).render_grouped(&recipe.to_grouped())
}

pub fn run(args: ImportArgs, grammar: &Grammar, printer: &Printer) -> Result<()> {
    let text = import_record(&read_source(&args.file)?, grammar)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &text).map_err(|e| RcmlError::Io {
                path: path.clone(),
                message: format!("Failed to write recipe: {}", e),
            })?;
            printer.status("Imported", &format!("{} -> {}", display_path(&args.file), display_path(path)));
        }
        None => print!("{}", text),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse;
    use crate::recipe::Recipe;
    use crate::transform::to_grouped;
    use crate::types::Group;

    fn record_json(recipe: Recipe) -> String {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        RecipeRecord::from_recipe(recipe, today).to_json().unwrap()
    }

    #[test]
    fn test_import_record() {
        let mut recipe = Recipe::new("Tea", "1 cup");
        recipe.ingredients = vec![Group::new().with_entries(["leaves"])];
        recipe.instructions = vec![Group::new().with_entries(["steep"])];
        let json = record_json(recipe);

        let text = import_record(&json, &Grammar::recipe()).unwrap();

        assert_eq!(
            text,
            "name: Tea\nmakes: 1 cup\nslug: tea\n\ningredients:\n\nleaves\n\ninstructions:\n\nsteep\n\nchangelog:\n\ndate: 2024-03-01\nentry: First publication\n"
        );

        let back = Recipe::from_grouped(&to_grouped(parse(&text, &Grammar::recipe()).unwrap())).unwrap();
        assert_eq!(back.slug.as_deref(), Some("tea"));
    }

    #[test]
    fn test_import_rejects_lines_that_read_as_keys() {
        let mut recipe = Recipe::new("Tea", "1 cup");
        recipe.ingredients = vec![Group::new().with_entries(["water", "Description: strong black tea"])];
        recipe.instructions = vec![Group::new().with_entries(["steep"])];

        let result = import_record(&record_json(recipe), &Grammar::recipe());
        assert!(matches!(result, Err(RcmlError::Serialize { .. })));
    }

    #[test]
    fn test_import_rejects_markers_outside_their_environment() {
        let mut recipe = Recipe::new("Tea", "1 cup");
        recipe.ingredients = vec![Group::named("Leaves").with_entries(["black tea"])];
        recipe.instructions = vec![Group::new().with_entries(["steep"])];
        recipe.changelog = Some(vec![Group::named("Spring").with_entry("v1")]);

        let result = import_record(&record_json(recipe), &Grammar::recipe());
        assert!(matches!(result, Err(RcmlError::InvalidSubkey { .. })));
    }

    #[test]
    fn test_import_invalid_json() {
        assert!(matches!(import_record("[]", &Grammar::recipe()), Err(RcmlError::Storage { .. })));
    }
}
