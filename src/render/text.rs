//! Recipe markup writer.
//!
//! Produces text that parses back to the same document:
//!
//! ```text
//! name: Pancakes
//! temperature: 180 degrees
//!
//! ingredients:
//!
//! part: Batter
//! optional: yes
//! 3 dl flour
//!
//! part: Topping
//! syrup
//! ```

use crate::error::{RcmlError, Result};
use crate::grammar::{Grammar, Resolved};
use crate::parser::{parse_scalar, render_scalar};
use crate::transform::{check_markers, from_grouped};
use crate::types::{Document, Entry, Field, GroupedDocument, Marker, MarkerKind, Value};

/// Writes documents as recipe markup for a grammar.
///
/// Anything that would read back differently under that grammar is an
/// error: keys the grammar does not know under their canonical name, markers
/// an environment does not allow, values that do not survive coercion, and
/// content lines that would be taken for markers, comments or top-level
/// keys.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer<'a> {
    grammar: &'a Grammar,
}

impl<'a> TextRenderer<'a> {
    pub fn new(grammar: &'a Grammar) -> Self {
        Self { grammar }
    }

    /// Render a flat document.
    pub fn render(&self, document: &Document) -> Result<String> {
        check_markers(document, self.grammar)?;

        let mut out = String::new();
        let mut after_environment = false;

        for (key, field) in document.iter() {
            match field {
                Field::Scalar(value) => {
                    self.check_key(key, Resolved::Key(key))?;
                    let rendered = check_scalar(key, value)?;
                    if after_environment {
                        out.push('\n');
                    }
                    out.push_str(&format!("{}: {}\n", key, rendered));
                    after_environment = false;
                }
                Field::Environment(entries) if entries.is_empty() => {}
                Field::Environment(entries) => {
                    self.check_key(key, Resolved::Environment(key))?;
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(&format!("{}:\n\n", key));
                    self.render_entries(key, entries, &mut out)?;
                    after_environment = true;
                }
            }
        }

        Ok(out)
    }

    /// Flatten and render a grouped document.
    pub fn render_grouped(&self, grouped: &GroupedDocument) -> Result<String> {
        self.render(&from_grouped(grouped.clone())?)
    }

    fn render_entries(&self, environment: &str, entries: &[Entry], out: &mut String) -> Result<()> {
        let mut after_content = false;

        for entry in entries {
            match entry {
                Entry::Line(text) => {
                    self.check_content(environment, text)?;
                    out.push_str(text);
                    out.push('\n');
                    after_content = true;
                }
                Entry::Marker(marker) => {
                    check_marker(environment, marker)?;
                    if after_content {
                        out.push('\n');
                    }
                    out.push_str(&marker.to_string());
                    out.push('\n');
                    after_content = false;
                }
            }
        }

        Ok(())
    }

    /// The key must read back as itself, with the same shape.
    fn check_key(&self, key: &str, expected: Resolved<'_>) -> Result<()> {
        let readable = !key.starts_with('#') && !key.contains([':', '\n', '\r']);
        if readable && self.grammar.resolve(key) == Some(expected) {
            return Ok(());
        }

        let shape = match expected {
            Resolved::Key(_) => "key",
            Resolved::Environment(_) => "environment",
        };
        Err(RcmlError::Serialize {
            message: format!("[{}] cannot be written as a {}", key, shape),
            help: Some(format!("Use a canonical {} name of the grammar", shape)),
        })
    }

    fn check_content(&self, environment: &str, text: &str) -> Result<()> {
        let fail = |reason: &str| {
            Err(RcmlError::Serialize {
                message: format!("line [{}] in [{}] {}", text, environment, reason),
                help: None,
            })
        };

        if text.trim().is_empty() {
            return fail("is empty");
        }
        if text.contains(['\n', '\r']) {
            return fail("spans several lines");
        }
        if text != text.trim() {
            return fail("has surrounding whitespace");
        }
        if text.starts_with('#') {
            return fail("would be read as a comment");
        }

        if let Some((key, _)) = text.split_once(':') {
            if MarkerKind::from_name(&key.trim().to_lowercase()).is_some() {
                return fail("would be read as a marker");
            }
            if self.grammar.resolve(key).is_some() {
                return fail("would end the environment");
            }
        }

        Ok(())
    }
}

fn check_scalar(key: &str, value: &Value) -> Result<String> {
    let rendered = render_scalar(value);

    if rendered.contains(['\n', '\r']) || parse_scalar(&rendered) != *value {
        return Err(RcmlError::Serialize {
            message: format!("value of [{}] would not read back as the same {}", key, value.kind()),
            help: Some(format!(
                "[{}] is written as [{}], which reads back as {}",
                key,
                rendered,
                parse_scalar(&rendered).kind()
            )),
        });
    }

    Ok(rendered)
}

fn check_marker(environment: &str, marker: &Marker) -> Result<()> {
    let name = match marker {
        Marker::Part(name) | Marker::Entry(name) => name,
        Marker::Optional(_) | Marker::Date(_) => return Ok(()),
    };

    if name.is_empty() || name != name.trim() || name.contains(['\n', '\r']) {
        return Err(RcmlError::Serialize {
            message: format!("[{}] in [{}] has an unwritable value [{}]", marker.kind(), environment, name),
            help: Some("Marker values must be non-empty single-line text".to_string()),
        });
    }
    Ok(())
}

/// Render a flat document as recipe markup for the built-in recipe grammar.
pub fn serialize(document: &Document) -> Result<String> {
    TextRenderer::new(&Grammar::recipe()).render(document)
}

/// Flatten a grouped document and render it for the built-in recipe
/// grammar.
pub fn serialize_grouped(grouped: &GroupedDocument) -> Result<String> {
    TextRenderer::new(&Grammar::recipe()).render_grouped(grouped)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse;
    use crate::types::{Duration, Group};

    fn pancakes() -> GroupedDocument {
        let mut doc = GroupedDocument::new();
        doc.insert_scalar("name", "Pancakes");
        doc.insert_scalar("temperature", Value::Temperature(180));
        doc.insert_environment(
            "ingredients",
            vec![
                Group::named("Batter").with_optional(true).with_entries(["3 dl flour", "6 dl milk"]),
                Group::named("Topping").with_entries(["syrup"]),
            ],
        );
        doc.insert_environment("instructions", vec![Group::new().with_entries(["Mix", "Fry"])]);
        doc
    }

    #[test]
    fn test_grouped_output() {
        let text = serialize_grouped(&pancakes()).unwrap();

        insta::assert_snapshot!(text, @r"
        name: Pancakes
        temperature: 180 degrees

        ingredients:

        part: Batter
        optional: yes
        3 dl flour
        6 dl milk

        part: Topping
        syrup

        instructions:

        Mix
        Fry
        ");
    }

    #[test]
    fn test_exact_layout() {
        let mut doc = Document::new();
        doc.insert_environment("notes", vec![Entry::line("Rest the batter")]);
        doc.insert_scalar("makes", "4");
        doc.insert_environment("tips", vec![]);

        assert_eq!(serialize(&doc).unwrap(), "notes:\n\nRest the batter\n\nmakes: 4\n");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(serialize(&Document::new()).unwrap(), "");
    }

    #[test]
    fn test_output_parses_back() {
        let grammar = Grammar::recipe();
        let mut doc = Document::new();
        doc.insert_scalar("name", "Stew");
        doc.insert_scalar("cooking_time", Value::Duration(Duration::from_minutes(135)));
        doc.insert_environment(
            "changelog",
            vec![
                Entry::Marker(Marker::Date(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap())),
                Entry::Marker(Marker::Entry("v1".into())),
                Entry::line("Created"),
                Entry::Marker(Marker::Entry("v2".into())),
                Entry::line("Less salt"),
            ],
        );

        let text = serialize(&doc).unwrap();
        assert_eq!(parse(&text, &grammar).unwrap(), doc);
    }

    #[test]
    fn test_string_that_reads_as_boolean_is_rejected() {
        let mut doc = Document::new();
        doc.insert_scalar("description", "yes");
        assert!(matches!(serialize(&doc), Err(RcmlError::Serialize { .. })));
    }

    #[test]
    fn test_unwritable_strings_are_rejected() {
        for value in ["", "  padded ", "two\nlines"] {
            let mut doc = Document::new();
            doc.insert_scalar("name", value);
            assert!(serialize(&doc).is_err(), "{:?}", value);
        }
    }

    #[test]
    fn test_unwritable_content_is_rejected() {
        for line in ["", "# heading", "part: sneaky", "Date: 2020-01-01", "a\nb", " x"] {
            let mut doc = Document::new();
            doc.insert_environment("notes", vec![Entry::line(line)]);
            assert!(serialize(&doc).is_err(), "{:?}", line);
        }
    }

    #[test]
    fn test_content_that_would_end_the_environment_is_rejected() {
        let mut doc = Document::new();
        doc.insert_environment("notes", vec![Entry::line("Makes: extra for guests")]);
        assert!(matches!(serialize(&doc), Err(RcmlError::Serialize { .. })));

        let mut doc = Document::new();
        doc.insert_environment("notes", vec![Entry::line("Tip: warm the plates")]);
        assert_eq!(serialize(&doc).unwrap(), "notes:\n\nTip: warm the plates\n");
    }

    #[test]
    fn test_key_like_ingredient_is_rejected() {
        let mut grouped = GroupedDocument::new();
        grouped.insert_scalar("name", "Tea");
        grouped.insert_environment(
            "ingredients",
            vec![Group::new().with_entries(["water", "Description: strong black tea"])],
        );

        assert!(matches!(serialize_grouped(&grouped), Err(RcmlError::Serialize { .. })));
    }

    #[test]
    fn test_disallowed_markers_are_rejected() {
        let day = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();

        let mut grouped = GroupedDocument::new();
        grouped.insert_environment("ingredients", vec![Group::dated(day).with_entries(["flour"])]);
        assert!(matches!(
            serialize_grouped(&grouped),
            Err(RcmlError::InvalidSubkey { line: None, .. })
        ));

        let mut grouped = GroupedDocument::new();
        grouped.insert_environment("changelog", vec![Group::named("Spring").with_entries(["New menu"])]);
        assert!(matches!(serialize_grouped(&grouped), Err(RcmlError::InvalidSubkey { .. })));
    }

    #[test]
    fn test_keys_must_be_canonical_for_the_grammar() {
        for (key, field) in [
            ("recipe", Field::Scalar(Value::from("Tea"))),
            ("banana", Field::Scalar(Value::from("split"))),
            ("ingredients", Field::Scalar(Value::from("flour"))),
            ("name", Field::Environment(vec![Entry::line("Tea")])),
        ] {
            let mut doc = Document::new();
            doc.insert(key, field);
            assert!(matches!(serialize(&doc), Err(RcmlError::Serialize { .. })), "{}", key);
        }
    }

    #[test]
    fn test_custom_grammar() {
        let grammar = Grammar::from_yaml("keys: [title]\nenvironments:\n  steps: [part]\n").unwrap();
        let mut doc = Document::new();
        doc.insert_scalar("title", "Toast");
        doc.insert_environment("steps", vec![Entry::Marker(Marker::Part("Bread".into())), Entry::line("toast it")]);

        let text = TextRenderer::new(&grammar).render(&doc).unwrap();
        assert_eq!(text, "title: Toast\n\nsteps:\n\npart: Bread\ntoast it\n");
        assert_eq!(parse(&text, &grammar).unwrap(), doc);
        assert!(serialize(&doc).is_err());
    }

    #[test]
    fn test_empty_part_name_is_rejected() {
        let mut doc = Document::new();
        doc.insert_environment("ingredients", vec![Entry::Marker(Marker::Part(String::new()))]);
        assert!(serialize(&doc).is_err());
    }
}
