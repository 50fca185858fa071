//! Parser for recipe markup files.
//!
//! Recipe files are line-oriented:
//!
//! ```text
//! name: Pancakes
//! makes: 8 pieces
//!
//! ingredients:
//!
//! part: Batter
//! 3 dl flour
//! ```
//!
//! Scalars are coerced to typed [`Value`](crate::types::Value)s; environment
//! contents are kept as a flat list of lines and markers. See
//! [`crate::transform`] for grouping them into parts.
//!
//! # Usage
//!
//! ```ignore
//! use rcml::grammar::Grammar;
//! use rcml::parser::parse;
//!
//! let source = std::fs::read_to_string("pancakes.recipe")?;
//! let document = parse(&source, &Grammar::recipe())?;
//! ```

pub mod coerce;
mod cursor;
mod loader;

pub use coerce::{coerce, parse_scalar, render_scalar};
pub use cursor::{Cursor, Line};
pub use loader::{parse, parse_reader, Loader};
