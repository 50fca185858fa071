//! JSON output for documents and records.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{RcmlError, Result};

/// Serialize any document, recipe or record as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| RcmlError::Storage {
        message: format!("Failed to serialize JSON: {}", e),
    })
}

/// Write pretty-printed JSON to a file.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = to_json(value)?;
    fs::write(path, json + "\n").map_err(|e| RcmlError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write JSON: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::types::{Group, GroupedDocument, Value};

    fn sample() -> GroupedDocument {
        let mut doc = GroupedDocument::new();
        doc.insert_scalar("name", "Toast");
        doc.insert_scalar("temperature", Value::Temperature(200));
        doc.insert_environment("ingredients", vec![Group::named("Base").with_entries(["bread"])]);
        doc
    }

    #[test]
    fn test_grouped_document_json() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": { "type": "string", "value": "Toast" },
                "temperature": { "type": "temperature", "value": 200 },
                "ingredients": [
                    { "name": "Base", "optional": false, "entries": ["bread"] }
                ]
            })
        );
    }

    #[test]
    fn test_write_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("toast.json");

        write_json(&sample(), &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.ends_with("}\n"));
        assert!(content.contains("\"Toast\""));
    }

    #[test]
    fn test_write_json_to_missing_directory() {
        let result = write_json(&sample(), Path::new("/nonexistent/dir/out.json"));
        assert!(matches!(result, Err(RcmlError::Io { .. })));
    }
}
