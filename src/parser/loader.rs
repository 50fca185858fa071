//! The line parser.
//!
//! A [`Loader`] reads recipe text into a flat [`Document`]. Top-level lines
//! are either `key: value` scalars or `key:` headers that open an
//! environment. An environment has no terminator: it ends right before the
//! first line whose key portion names a top-level key or environment.

use std::io::Read;

use tracing::{debug, trace};

use crate::error::{RcmlError, Result};
use crate::grammar::{Grammar, Resolved};
use crate::types::{Document, Entry, Field, Marker, MarkerKind, ValueKind};

use super::coerce::{coerce, parse_scalar};
use super::cursor::{Cursor, Line};

/// A single-use parse session over one input.
///
/// ```ignore
/// let grammar = Grammar::recipe();
/// let mut loader = Loader::new(&source, &grammar);
/// let document = loader.load()?;
/// assert!(loader.load().is_err()); // already consumed
/// ```
#[derive(Debug)]
pub struct Loader<'a> {
    source: &'a str,
    grammar: &'a Grammar,
    loaded: bool,
}

impl<'a> Loader<'a> {
    pub fn new(source: &'a str, grammar: &'a Grammar) -> Self {
        Self {
            source,
            grammar,
            loaded: false,
        }
    }

    /// Parse the input. A loader can only be used once, whether or not the
    /// first attempt succeeded.
    pub fn load(&mut self) -> Result<Document> {
        if self.loaded {
            return Err(RcmlError::AlreadyConsumed);
        }
        self.loaded = true;

        let mut cursor = Cursor::new(self.source);
        let mut document = Document::new();

        while let Some(line) = cursor.next() {
            if line.is_comment() {
                continue;
            }

            let (key, field) = self.read_key(line, &mut cursor)?;
            if field.as_environment().is_some_and(|entries| entries.is_empty()) {
                trace!(line = line.number, environment = %key, "skipped empty environment");
                continue;
            }
            if document.insert(key, field).is_some() {
                debug!(line = line.number, "key assigned twice, keeping the last value");
            }
        }

        debug!(fields = document.len(), "loaded document");
        Ok(document)
    }

    fn read_key(&self, line: Line<'_>, cursor: &mut Cursor<'_>) -> Result<(String, Field<Entry>)> {
        let text = line.text;

        if let Some(name) = text.strip_suffix(':') {
            return match self.grammar.resolve(name) {
                Some(Resolved::Environment(environment)) => {
                    let entries = self.read_environment(environment, cursor)?;
                    trace!(line = line.number, environment, entries = entries.len(), "parsed environment");
                    Ok((environment.to_string(), Field::Environment(entries)))
                }
                _ => Err(RcmlError::InvalidEnvironment {
                    line: line.number,
                    name: name.trim().to_string(),
                }),
            };
        }

        let Some((key, value)) = text.split_once(':') else {
            return Err(RcmlError::MalformedLine {
                line: line.number,
                text: text.to_string(),
                reason: "is not a valid key: value pair".to_string(),
            });
        };

        match self.grammar.resolve(key) {
            Some(Resolved::Key(canonical)) => {
                let value = parse_scalar(value);
                trace!(line = line.number, key = canonical, ?value, "parsed scalar");
                Ok((canonical.to_string(), Field::Scalar(value)))
            }
            Some(Resolved::Environment(environment)) => Err(RcmlError::UnknownKey {
                line: line.number,
                key: key.trim().to_lowercase(),
                help: Some(format!(
                    "[{}] is an environment: write `{}:` and put its entries on the following lines",
                    environment, environment
                )),
            }),
            None => Err(RcmlError::UnknownKey {
                line: line.number,
                key: key.trim().to_lowercase(),
                help: Some(format!(
                    "Valid keys are: {}",
                    self.grammar.keys().collect::<Vec<_>>().join(", ")
                )),
            }),
        }
    }

    fn read_environment(&self, environment: &str, cursor: &mut Cursor<'_>) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();

        while let Some(next) = cursor.peek() {
            if self.starts_top_level(next) {
                break;
            }
            cursor.next();

            if next.is_comment() {
                continue;
            }
            entries.push(self.read_entry(environment, next)?);
        }

        Ok(entries)
    }

    /// Lookahead check: does this line belong to the top level?
    fn starts_top_level(&self, line: Line<'_>) -> bool {
        line.key_portion()
            .and_then(|key| self.grammar.resolve(key))
            .is_some()
    }

    fn read_entry(&self, environment: &str, line: Line<'_>) -> Result<Entry> {
        let marker = line.text.split_once(':').and_then(|(key, value)| {
            MarkerKind::from_name(&key.trim().to_lowercase()).map(|kind| (kind, value.trim()))
        });

        let Some((kind, value)) = marker else {
            return Ok(Entry::Line(line.text.to_string()));
        };

        self.grammar.check_subkey(environment, kind, Some(line.number))?;

        let marker = match kind {
            MarkerKind::Part | MarkerKind::Entry if value.is_empty() => {
                return Err(RcmlError::MalformedLine {
                    line: line.number,
                    text: line.text.to_string(),
                    reason: format!("needs a value after `{}:`", kind),
                });
            }
            MarkerKind::Part => Marker::Part(value.to_string()),
            MarkerKind::Entry => Marker::Entry(value.to_string()),
            MarkerKind::Optional => coerce(value, ValueKind::Boolean)
                .ok()
                .and_then(|v| v.as_bool())
                .map(Marker::Optional)
                .ok_or_else(|| coercion_error(line, value, ValueKind::Boolean))?,
            MarkerKind::Date => coerce(value, ValueKind::Date)
                .ok()
                .and_then(|v| v.as_date())
                .map(Marker::Date)
                .ok_or_else(|| coercion_error(line, value, ValueKind::Date))?,
        };

        trace!(line = line.number, environment, %marker, "parsed marker");
        Ok(Entry::Marker(marker))
    }
}

fn coercion_error(line: Line<'_>, text: &str, expected: ValueKind) -> RcmlError {
    RcmlError::TypeCoercion {
        line: Some(line.number),
        text: text.to_string(),
        expected: expected.name().to_string(),
    }
}

/// Parse recipe text with the given grammar.
pub fn parse(source: &str, grammar: &Grammar) -> Result<Document> {
    Loader::new(source, grammar).load()
}

/// Read a whole stream and parse it.
pub fn parse_reader<R: Read>(mut reader: R, grammar: &Grammar) -> Result<Document> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    parse(&source, grammar)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::render::serialize;
    use crate::types::{Duration, Value};

    fn recipe(source: &str) -> Result<Document> {
        parse(source, &Grammar::recipe())
    }

    fn lines(items: &[&str]) -> Vec<Entry> {
        items.iter().map(|s| Entry::line(*s)).collect()
    }

    #[test]
    fn test_scalars_are_typed() {
        let doc = recipe(
            "name: Pancakes\nmakes: 8 pieces\ntemperature: 180 degrees\ncooking time: 1 hour 15 minutes\n",
        )
        .unwrap();

        assert_eq!(doc.scalar("name"), Some(&Value::from("Pancakes")));
        assert_eq!(doc.scalar("makes"), Some(&Value::from("8 pieces")));
        assert_eq!(doc.scalar("temperature"), Some(&Value::Temperature(180)));
        assert_eq!(
            doc.scalar("cooking_time"),
            Some(&Value::Duration(Duration::from_minutes(75)))
        );
    }

    #[test]
    fn test_keys_are_case_insensitive_and_aliased() {
        let doc = recipe("Recipe: Waffles\nNAME: Crepes\n").unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.scalar("name"), Some(&Value::from("Crepes")));
    }

    #[test]
    fn test_value_may_contain_colons() {
        let doc = recipe("description: Serve at 18:30 sharp\n").unwrap();
        assert_eq!(doc.scalar("description"), Some(&Value::from("Serve at 18:30 sharp")));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let doc = recipe("# a comment\n\n\nname: Soup\n\ningredients:\n# skipped\n\nwater\n\n\nsalt\n").unwrap();

        assert_eq!(doc.environment("ingredients"), Some(lines(&["water", "salt"]).as_slice()));
    }

    #[test]
    fn test_environment_ends_at_next_environment() {
        let doc = recipe("ingredients:\n  flour\ninstructions:\n  mix\n").unwrap();

        assert_eq!(doc.environment("ingredients"), Some(lines(&["flour"]).as_slice()));
        assert_eq!(doc.environment("instructions"), Some(lines(&["mix"]).as_slice()));
    }

    #[test]
    fn test_environment_ends_at_scalar_key() {
        let doc = recipe("notes:\nBest fresh\nName: Bread\n").unwrap();

        assert_eq!(doc.environment("notes"), Some(lines(&["Best fresh"]).as_slice()));
        assert_eq!(doc.scalar("name"), Some(&Value::from("Bread")));
    }

    #[test]
    fn test_environment_content_with_unrelated_colon() {
        let doc = recipe("ingredients:\nFlour: 2 cups\n").unwrap();
        assert_eq!(doc.environment("ingredients"), Some(lines(&["Flour: 2 cups"]).as_slice()));
    }

    #[test]
    fn test_markers() {
        let doc = recipe("ingredients:\npart: Batter\nOptional: Yes\nflour\n").unwrap();

        assert_eq!(
            doc.environment("ingredients"),
            Some(
                vec![
                    Entry::Marker(Marker::Part("Batter".into())),
                    Entry::Marker(Marker::Optional(true)),
                    Entry::line("flour"),
                ]
                .as_slice()
            )
        );
    }

    #[test]
    fn test_changelog_markers() {
        let doc = recipe("changelog:\ndate: 2021-05-01\nentry: v1\nFirst version\n").unwrap();
        let date = NaiveDate::from_ymd_opt(2021, 5, 1).unwrap();

        assert_eq!(
            doc.environment("changelog"),
            Some(
                vec![
                    Entry::Marker(Marker::Date(date)),
                    Entry::Marker(Marker::Entry("v1".into())),
                    Entry::line("First version"),
                ]
                .as_slice()
            )
        );
    }

    #[test]
    fn test_empty_environment_is_dropped() {
        let doc = recipe("tips:\nname: Tea\nnotes:\n# nothing yet\nmakes: 1 cup\n").unwrap();

        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["name", "makes"]);
        assert!(doc.environment("tips").is_none());
        assert!(doc.environment("notes").is_none());
    }

    #[test]
    fn test_empty_environment_round_trip() {
        let doc = recipe("name: Tea\ntips:\n# nothing yet\nmakes: 1 cup\nnotes:\n").unwrap();
        let text = serialize(&doc).unwrap();

        assert_eq!(text, "name: Tea\nmakes: 1 cup\n");
        assert_eq!(recipe(&text).unwrap(), doc);
    }

    #[test]
    fn test_malformed_line() {
        let err = recipe("name: Soup\n\nfoo bar\n").unwrap_err();

        assert!(matches!(err, RcmlError::MalformedLine { line: 3, ref text, .. } if text == "foo bar"));
    }

    #[test]
    fn test_unknown_environment() {
        let err = recipe("name: Soup\nbanana:\n").unwrap_err();
        assert!(matches!(err, RcmlError::InvalidEnvironment { line: 2, ref name } if name == "banana"));
    }

    #[test]
    fn test_scalar_key_used_as_environment() {
        let err = recipe("name:\n").unwrap_err();
        assert!(matches!(err, RcmlError::InvalidEnvironment { .. }));
    }

    #[test]
    fn test_unknown_key() {
        let err = recipe("banana: yellow\n").unwrap_err();
        assert!(matches!(err, RcmlError::UnknownKey { line: 1, ref key, .. } if key == "banana"));
    }

    #[test]
    fn test_environment_with_inline_value() {
        let err = recipe("ingredients: flour\n").unwrap_err();
        assert!(matches!(err, RcmlError::UnknownKey { .. }));
    }

    #[test]
    fn test_marker_not_allowed_in_environment() {
        let err = recipe("ingredients:\ndate: 2020-01-01\n").unwrap_err();
        assert!(matches!(
            err,
            RcmlError::InvalidSubkey { line: Some(2), ref environment, ref key, .. }
                if environment == "ingredients" && key == "date"
        ));
    }

    #[test]
    fn test_optional_must_be_boolean() {
        let err = recipe("ingredients:\npart: Sauce\noptional: perhaps\n").unwrap_err();
        assert!(matches!(err, RcmlError::TypeCoercion { line: Some(3), .. }));
    }

    #[test]
    fn test_date_marker_must_be_date() {
        let err = recipe("changelog:\ndate: last tuesday\n").unwrap_err();
        assert!(matches!(err, RcmlError::TypeCoercion { line: Some(2), ref expected, .. } if expected == "date"));
    }

    #[test]
    fn test_part_needs_name() {
        let err = recipe("ingredients:\npart:\nflour\n").unwrap_err();
        assert!(matches!(err, RcmlError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_loader_is_single_use() {
        let grammar = Grammar::recipe();
        let mut loader = Loader::new("name: Soup\n", &grammar);

        assert!(loader.load().is_ok());
        assert!(matches!(loader.load(), Err(RcmlError::AlreadyConsumed)));
    }

    #[test]
    fn test_failed_load_still_consumes() {
        let grammar = Grammar::recipe();
        let mut loader = Loader::new("foo\n", &grammar);

        assert!(loader.load().is_err());
        assert!(matches!(loader.load(), Err(RcmlError::AlreadyConsumed)));
    }

    #[test]
    fn test_parse_reader() {
        let doc = parse_reader("name: Stew\n".as_bytes(), &Grammar::recipe()).unwrap();
        assert_eq!(doc.scalar("name"), Some(&Value::from("Stew")));
    }

    #[test]
    fn test_custom_grammar() {
        let grammar = Grammar::from_yaml(
            "keys: [title]\nenvironments:\n  steps: [part]\naliases:\n  heading: title\n",
        )
        .unwrap();
        let doc = parse("Heading: Tea\nsteps:\npart: Brew\nboil water\n", &grammar).unwrap();

        assert_eq!(doc.scalar("title"), Some(&Value::from("Tea")));
        assert_eq!(doc.environment("steps").map(|e| e.len()), Some(2));
        assert!(parse("name: Tea\n", &grammar).is_err());
    }
}
