//! Core document types for rcml.
//!
//! - `Value` - typed scalars (durations, temperatures, dates, booleans, text)
//! - `Document` - ordered fields as produced by the parser
//! - `Group` / `GroupedDocument` - environments split into parts

mod document;
mod group;
mod value;

pub use document::{Document, Entry, Field, GroupedDocument, Marker, MarkerKind};
pub use group::Group;
pub use value::{Duration, Value, ValueKind, DATE_FORMAT};
