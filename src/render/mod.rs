//! Output for rcml.
//!
//! This module writes documents back out, either as recipe markup that
//! parses to the same document or as JSON.

mod json;
mod text;

pub use json::{to_json, write_json};
pub use text::{serialize, serialize_grouped, TextRenderer};
