//! JSONL document source parsing.
//!
//! The Document Source collaborator (PDF/text extractors) emits one JSON
//! object per line with at least `title` and `text`. This module parses
//! those records into [`Document`]s with a skip-and-count policy: a
//! malformed record never aborts a build, it is counted and the rest of the
//! input keeps flowing.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::document::Document;
use crate::error::{RagError, Result};

/// Parse one JSONL record into a [`Document`].
///
/// `title` and `text` must be present, be strings, and `text` must be
/// non-empty after trimming. Every other field is retained as opaque string
/// metadata (non-string values are kept in their JSON encoding).
///
/// # Errors
///
/// Returns [`RagError::Parse`] for invalid JSON or missing/empty required
/// fields.
pub fn parse_record(line: &str) -> Result<Document> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| RagError::Parse(format!("invalid JSON: {e}")))?;
    let Value::Object(mut fields) = value else {
        return Err(RagError::Parse("record is not a JSON object".to_string()));
    };

    let title = match fields.remove("title") {
        Some(Value::String(s)) => s,
        Some(_) => return Err(RagError::Parse("field 'title' is not a string".to_string())),
        None => return Err(RagError::Parse("missing field 'title'".to_string())),
    };
    let text = match fields.remove("text") {
        Some(Value::String(s)) => s,
        Some(_) => return Err(RagError::Parse("field 'text' is not a string".to_string())),
        None => return Err(RagError::Parse("missing field 'text'".to_string())),
    };
    if text.trim().is_empty() {
        return Err(RagError::Parse("field 'text' is empty".to_string()));
    }

    let metadata: HashMap<String, String> = fields
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => (key, s),
            other => (key, other.to_string()),
        })
        .collect();

    Ok(Document { title, text, metadata })
}

/// Load all records from one JSONL file.
///
/// Returns the parsed documents plus the number of malformed records
/// skipped. Blank lines are ignored without counting.
///
/// # Errors
///
/// Returns [`RagError::Persist`] if the file cannot be read.
pub fn load_jsonl(path: &Path) -> Result<(Vec<Document>, usize)> {
    let file = File::open(path).map_err(|e| RagError::Persist {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut documents = Vec::new();
    let mut skipped = 0;
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| RagError::Persist {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(&line) {
            Ok(document) => documents.push(document),
            Err(e) => {
                warn!(file = %path.display(), line = lineno + 1, error = %e, "skipping record");
                skipped += 1;
            }
        }
    }
    Ok((documents, skipped))
}

/// Load every `*.jsonl` file in a directory, in sorted filename order.
///
/// Returns all parsed documents plus the total number of skipped records.
///
/// # Errors
///
/// Returns [`RagError::Persist`] if the directory or any file cannot be
/// read.
pub fn load_dir(dir: &Path) -> Result<(Vec<Document>, usize)> {
    let entries = std::fs::read_dir(dir).map_err(|e| RagError::Persist {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
        .collect();
    paths.sort();

    let mut documents = Vec::new();
    let mut skipped = 0;
    for path in paths {
        let (docs, file_skipped) = load_jsonl(&path)?;
        documents.extend(docs);
        skipped += file_skipped;
    }
    Ok((documents, skipped))
}
