//! Recipe file loading.
//!
//! Reads discovered files and runs them through the parser, transformer and
//! recipe model, keeping per-file failures instead of stopping at the first.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RcmlError, Result};
use crate::grammar::Grammar;
use crate::parser::parse;
use crate::recipe::Recipe;
use crate::transform::to_grouped;
use crate::types::GroupedDocument;

use super::scanner::ScanResult;

/// A recipe file and what came out of loading it.
#[derive(Debug)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub result: Result<Recipe>,
}

/// Read a file into a string.
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| RcmlError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read recipe: {}", e),
    })
}

/// Parse and group one file.
pub fn load_document(path: &Path, grammar: &Grammar) -> Result<GroupedDocument> {
    let source = read_source(path)?;
    let document = parse(&source, grammar)?;
    debug!(path = %path.display(), fields = document.len(), "parsed recipe file");
    Ok(to_grouped(document))
}

/// Parse one file into a recipe.
pub fn load_recipe(path: &Path, grammar: &Grammar) -> Result<Recipe> {
    Recipe::from_grouped(&load_document(path, grammar)?)
}

/// Load every scanned file.
pub fn load_recipes(scan: &ScanResult, grammar: &Grammar) -> Vec<LoadedFile> {
    scan.recipes
        .iter()
        .map(|path| LoadedFile {
            path: path.clone(),
            result: load_recipe(path, grammar),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_recipe() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tea.recipe");
        fs::write(
            &path,
            "name: Tea\nmakes: 1 cup\ningredients:\ntea leaves\ninstructions:\nsteep\n",
        )
        .unwrap();

        let recipe = load_recipe(&path, &Grammar::recipe()).unwrap();
        assert_eq!(recipe.name, "Tea");
        assert_eq!(recipe.ingredient_lines().collect::<Vec<_>>(), vec!["tea leaves"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_recipe(Path::new("/nonexistent/tea.recipe"), &Grammar::recipe());
        assert!(matches!(result, Err(RcmlError::Io { .. })));
    }

    #[test]
    fn test_load_recipes_keeps_failures() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("a.recipe");
        let bad = dir.path().join("b.recipe");
        fs::write(&good, "name: A\nmakes: 1\ningredients:\nx\ninstructions:\ny\n").unwrap();
        fs::write(&bad, "name: B\nbanana:\n").unwrap();

        let scan = ScanResult {
            recipes: vec![good, bad],
        };
        let loaded = load_recipes(&scan, &Grammar::recipe());

        assert!(loaded[0].result.is_ok());
        assert!(matches!(loaded[1].result, Err(RcmlError::InvalidEnvironment { line: 2, .. })));
    }
}
