//! Recipe discovery for rcml projects.
//!
//! Finds recipe files under a project directory, either by scanning the
//! whole directory or by following an `rcml.yaml` manifest.
//!
//! # Example
//!
//! ```ignore
//! use rcml::discovery::discover;
//!
//! let project = discover("./cookbook")?;
//! let grammar = project.grammar()?;
//! for file in project.load(&grammar) {
//!     println!("{}: {}", file.path.display(), file.result.is_ok());
//! }
//! ```

mod loader;
mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::grammar::Grammar;

pub use loader::{load_document, load_recipe, load_recipes, read_source, LoadedFile};
pub use manifest::{Manifest, DEFAULT_EXTENSION};
pub use scanner::{is_recipe_file, scan_directory, scan_sources, ScanResult};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "rcml.yaml";

/// Result of discovering recipes in a project.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no rcml.yaml was found).
    pub manifest: Manifest,

    /// Whether an rcml.yaml manifest was found.
    pub has_manifest: bool,

    pub scan: ScanResult,
}

impl DiscoveryResult {
    /// The grammar named by the manifest, or the built-in recipe grammar.
    pub fn grammar(&self) -> Result<Grammar> {
        match self.manifest.grammar_path(&self.root) {
            Some(path) => Grammar::load(&path),
            None => Ok(Grammar::recipe()),
        }
    }

    /// Parse every discovered recipe.
    pub fn load(&self, grammar: &Grammar) -> Vec<LoadedFile> {
        load_recipes(&self.scan, grammar)
    }
}

/// Discover recipes in a project directory.
///
/// Uses the source directories of `rcml.yaml` when the root has one,
/// otherwise scans the whole root.
pub fn discover(root: impl AsRef<Path>) -> Result<DiscoveryResult> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = root.join(MANIFEST_FILENAME);
    let (manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    let scan = scan_sources(&manifest.effective_sources(), &root, &manifest);
    debug!(root = %root.display(), recipes = scan.total(), has_manifest, "discovered recipes");

    Ok(DiscoveryResult {
        root,
        manifest,
        has_manifest,
        scan,
    })
}

/// Discover recipes from explicit paths (no manifest lookup).
///
/// Directories are scanned; files are taken as given, whatever their
/// extension.
pub fn discover_paths(paths: &[PathBuf]) -> DiscoveryResult {
    let manifest = Manifest::default();
    let mut scan = ScanResult::new();

    for path in paths {
        if path.is_dir() {
            scan.merge(scan_directory(path, &manifest));
        } else {
            scan.merge(ScanResult {
                recipes: vec![path.clone()],
            });
        }
    }

    let root = paths
        .first()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    DiscoveryResult {
        root,
        manifest,
        has_manifest: false,
        scan,
    }
}
