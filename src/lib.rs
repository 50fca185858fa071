//! rcml - recipe markup
//!
//! A library for reading and writing line-oriented recipe files: scalar
//! `key: value` lines, environment blocks of entries and markers, and the
//! grouped form used by tools and storage.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod grammar;
pub mod output;
pub mod parser;
pub mod recipe;
pub mod render;
pub mod transform;
pub mod types;
pub mod validation;

pub use discovery::{discover, discover_paths, DiscoveryResult, LoadedFile, Manifest, ScanResult};
pub use error::{RcmlError, Result};
pub use grammar::{Grammar, GrammarConfig};
pub use parser::{coerce, parse, parse_reader, parse_scalar, render_scalar, Loader};
pub use recipe::{slugify, Recipe, RecipeRecord};
pub use render::{serialize, serialize_grouped, to_json, TextRenderer};
pub use transform::{from_grouped, to_grouped};
pub use types::{
    Document, Duration, Entry, Field, Group, GroupedDocument, Marker, MarkerKind, Value, ValueKind,
};
pub use validation::{validate_recipe, Diagnostic, Severity, ValidationResult};
