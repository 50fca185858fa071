//! Project manifest (rcml.yaml) parsing.
//!
//! The manifest says where recipe files live, which file extension they use,
//! what to skip, and optionally which grammar file to parse them with.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::error::{RcmlError, Result};

/// Default file extension for recipe files.
pub const DEFAULT_EXTENSION: &str = "recipe";

const EXCLUDE_MATCHING: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Project manifest loaded from rcml.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directories to scan for recipes, relative to the project root.
    /// Defaults to the root itself.
    pub sources: Vec<String>,

    /// Grammar file to use instead of the built-in recipe grammar.
    pub grammar: Option<PathBuf>,

    /// Extension of recipe files, without the leading dot.
    pub extension: String,

    /// Glob patterns to exclude (`*`, `?`, `[..]` and `**`).
    pub excludes: Vec<String>,

    /// `excludes`, compiled when the manifest is parsed.
    #[serde(skip)]
    patterns: Vec<Pattern>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            sources: vec![],
            grammar: None,
            extension: DEFAULT_EXTENSION.to_string(),
            excludes: vec![],
            patterns: vec![],
        }
    }
}

impl Manifest {
    /// Load manifest from an rcml.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RcmlError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(content).map_err(|e| RcmlError::Configuration {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check rcml.yaml syntax".to_string()),
        })?;

        let extension = manifest.extension.trim_start_matches('.').to_string();
        if extension.is_empty() {
            return Err(RcmlError::Configuration {
                message: "Manifest sets an empty recipe extension".to_string(),
                help: Some(format!("Remove `extension` to use `{}`", DEFAULT_EXTENSION)),
            });
        }

        let patterns = manifest
            .excludes
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| RcmlError::Configuration {
                    message: format!("Invalid exclude pattern '{}': {}", pattern, e),
                    help: Some("Excludes are glob patterns such as `*.bak` or `drafts/**`".to_string()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            extension,
            patterns,
            ..manifest
        })
    }

    /// Whether a path matches one of the exclude patterns.
    ///
    /// A pattern matches the whole path or any run of its components, so
    /// `drafts/*` excludes `drafts/a` and `x/drafts/a/b`.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let parts: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();

        (0..parts.len()).any(|start| {
            (start + 1..=parts.len()).any(|end| {
                let candidate = parts[start..end].join("/");
                self.patterns
                    .iter()
                    .any(|pattern| pattern.matches_with(&candidate, EXCLUDE_MATCHING))
            })
        })
    }

    /// Source directories, defaulting to the project root.
    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }

    /// The grammar file, resolved against the project root.
    pub fn grammar_path(&self, root: &Path) -> Option<PathBuf> {
        self.grammar.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                root.join(path)
            }
        })
    }
}
