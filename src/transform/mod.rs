//! Grouping of environment entries into parts.
//!
//! The parser leaves environments as a flat list of lines and markers. This
//! module folds them into [`Group`]s and back:
//!
//! - `part:` starts a new named group (replacing the implicit leading group
//!   if nothing has been added to it yet)
//! - `optional:` flags the current group
//! - `date:` / `entry:` tag the current group, or start a new group when the
//!   current one already carries a different value
//! - content lines are appended to the current group

use tracing::trace;

use crate::error::{RcmlError, Result};
use crate::grammar::Grammar;
use crate::types::{Document, Entry, Field, Group, GroupedDocument, Marker, MarkerKind};

/// Group every environment of a document. Scalars are carried over as-is.
pub fn to_grouped(document: Document) -> GroupedDocument {
    document
        .into_iter()
        .map(|(key, field)| {
            let field = match field {
                Field::Scalar(value) => Field::Scalar(value),
                Field::Environment(entries) => {
                    let groups = group_entries(&entries);
                    trace!(environment = %key, groups = groups.len(), "grouped environment");
                    Field::Environment(groups)
                }
            };
            (key, field)
        })
        .collect()
}

/// Flatten every environment of a grouped document back into markers and
/// lines.
pub fn from_grouped(grouped: GroupedDocument) -> Result<Document> {
    grouped
        .into_iter()
        .map(|(key, field)| {
            let field = match field {
                Field::Scalar(value) => Field::Scalar(value),
                Field::Environment(groups) => Field::Environment(flatten_groups(&key, &groups)?),
            };
            Ok((key, field))
        })
        .collect()
}

/// Check that every marker sits in an environment that allows it.
///
/// The parser already enforces this for documents it reads; documents built
/// by hand or flattened from groups go through here before being written.
pub fn check_markers(document: &Document, grammar: &Grammar) -> Result<()> {
    for (environment, field) in document.iter() {
        let Some(entries) = field.as_environment() else {
            continue;
        };
        for entry in entries {
            if let Entry::Marker(marker) = entry {
                grammar.check_subkey(environment, marker.kind(), None)?;
            }
        }
    }
    Ok(())
}

/// Fold a flat environment into groups.
pub fn group_entries(entries: &[Entry]) -> Vec<Group> {
    let mut groups = vec![Group::new()];

    for entry in entries {
        // Never empty: starts with the implicit group and only grows.
        let last = groups.len() - 1;

        match entry {
            Entry::Line(text) => groups[last].entries.push(text.clone()),
            Entry::Marker(Marker::Part(name)) => {
                if last == 0 && groups[0].is_pristine() {
                    groups[0] = Group::named(name.clone());
                } else {
                    groups.push(Group::named(name.clone()));
                }
            }
            Entry::Marker(Marker::Optional(flag)) => groups[last].optional = *flag,
            Entry::Marker(Marker::Date(date)) => {
                if groups[last].date.is_some_and(|existing| existing != *date) {
                    groups.push(Group::dated(*date));
                } else {
                    groups[last].date = Some(*date);
                }
            }
            Entry::Marker(Marker::Entry(tag)) => {
                if groups[last].entry.as_ref().is_some_and(|existing| existing != tag) {
                    groups.push(Group::tagged(tag.clone()));
                } else {
                    groups[last].entry = Some(tag.clone());
                }
            }
        }
    }

    if groups.first().is_some_and(Group::is_pristine) {
        groups.remove(0);
    }

    groups
}

/// Emit the markers and lines that [`group_entries`] folds back into
/// `groups`.
///
/// Fails when a group boundary cannot be expressed: an unnamed group after
/// the first one needs a `date:` or `entry:` that differs from the previous
/// group, and a leading unnamed group must not be empty.
pub fn flatten_groups(environment: &str, groups: &[Group]) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut previous: Option<&Group> = None;

    for (index, group) in groups.iter().enumerate() {
        let boundary = boundary_marker(environment, index, group, previous)?;
        let split_on = boundary.as_ref().map(Marker::kind);

        entries.extend(boundary.map(Entry::Marker));

        if let Some(date) = group.date {
            if split_on != Some(MarkerKind::Date) {
                entries.push(Entry::Marker(Marker::Date(date)));
            }
        }
        if let Some(tag) = &group.entry {
            if split_on != Some(MarkerKind::Entry) {
                entries.push(Entry::Marker(Marker::Entry(tag.clone())));
            }
        }
        if group.optional {
            entries.push(Entry::Marker(Marker::Optional(true)));
        }
        entries.extend(group.entries.iter().cloned().map(Entry::Line));

        previous = Some(group);
    }

    Ok(entries)
}

fn boundary_marker(
    environment: &str,
    index: usize,
    group: &Group,
    previous: Option<&Group>,
) -> Result<Option<Marker>> {
    if let Some(name) = &group.name {
        return Ok(Some(Marker::Part(name.clone())));
    }

    let Some(previous) = previous else {
        if group.is_pristine() {
            return Err(RcmlError::Serialize {
                message: format!("[{}] starts with an empty unnamed group", environment),
                help: Some("Remove the empty group or give it a name".to_string()),
            });
        }
        return Ok(None);
    };

    if let (Some(date), Some(last)) = (group.date, previous.date) {
        if date != last {
            return Ok(Some(Marker::Date(date)));
        }
    }
    if let (Some(tag), Some(last)) = (&group.entry, &previous.entry) {
        if tag != last {
            return Ok(Some(Marker::Entry(tag.clone())));
        }
    }

    Err(RcmlError::Serialize {
        message: format!(
            "group {} of [{}] has no name and nothing that separates it from the group before",
            index + 1,
            environment
        ),
        help: Some("Name the group, or give it a date or entry different from the previous group".to_string()),
    })
}
