//! File system scanner for recipe files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::manifest::Manifest;

/// Result of scanning for recipe files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Discovered recipe files, sorted.
    pub recipes: Vec<PathBuf>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Merge another scan result into this one, dropping duplicates.
    pub fn merge(&mut self, other: ScanResult) {
        self.recipes.extend(other.recipes);
        self.recipes.sort();
        self.recipes.dedup();
    }
}

/// Whether a file has the recipe extension.
pub fn is_recipe_file(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Recursively scan a directory for recipe files.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    if !root.exists() {
        return result;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if manifest.is_excluded(relative) {
            continue;
        }

        if is_recipe_file(path, &manifest.extension) {
            result.recipes.push(path.to_path_buf());
        }
    }

    result.recipes.sort();
    result
}

/// Scan every source directory of a manifest.
pub fn scan_sources(sources: &[String], base_path: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    for source in sources {
        let source_path = if Path::new(source).is_absolute() {
            PathBuf::from(source)
        } else {
            base_path.join(source)
        };

        result.merge(scan_directory(&source_path, manifest));
    }

    result
}
