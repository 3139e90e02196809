//! Decoding redirect documents into entries.
//!
//! # Responsibilities
//! - Parse YAML or JSON bytes into an ordered `Vec<Entry>`
//! - Keep every record that decodes, report every record that doesn't
//!
//! # Design Decisions
//! - Two passes: document → generic value, then value → `Entry` per record.
//!   A syntax error loses the whole document; a bad record loses only itself.
//! - Empty input and a `null` document are an empty list, not an error
//! - Missing fields are empty strings; only wrong types fail a record
//! - A multi-document YAML stream is read up to its first document
//! - Decoding never panics and always returns the entries it has

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::redirect::table::Entry;

/// Structured-data format of a redirect document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Infer the format from a file extension (`.yaml`, `.yml`, `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => write!(f, "YAML"),
            Format::Json => write!(f, "JSON"),
        }
    }
}

/// A single record that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Zero-based position of the record in the document.
    pub index: usize,
    pub message: String,
}

/// Errors produced while decoding a redirect document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a list of entries.
    #[error("expected a sequence of redirect entries, found {found}")]
    NotASequence { found: &'static str },

    /// Some records are not mappings or have fields of the wrong type.
    #[error("{} of {total} redirect entries could not be decoded: {}", .failures.len(), describe(.failures))]
    Records {
        total: usize,
        failures: Vec<RecordError>,
    },
}

fn describe(failures: &[RecordError]) -> String {
    failures
        .iter()
        .map(|f| format!("entry {}: {}", f.index, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decode `data` into redirect entries.
///
/// Returns whatever entries could be recovered together with the error, if any.
/// On a syntax error the entry list is empty.
pub fn decode_entries(data: &[u8], format: Format) -> (Vec<Entry>, Option<DecodeError>) {
    if data.iter().all(u8::is_ascii_whitespace) {
        return (Vec::new(), None);
    }

    match format {
        Format::Yaml => match first_yaml_document(data) {
            Ok(serde_yaml::Value::Null) => (Vec::new(), None),
            Ok(serde_yaml::Value::Sequence(items)) => {
                collect_records(items, serde_yaml::from_value::<Entry>)
            }
            Ok(other) => (
                Vec::new(),
                Some(DecodeError::NotASequence {
                    found: yaml_kind(&other),
                }),
            ),
            Err(e) => (Vec::new(), Some(DecodeError::Yaml(e))),
        },
        Format::Json => match serde_json::from_slice::<serde_json::Value>(data) {
            Ok(serde_json::Value::Null) => (Vec::new(), None),
            Ok(serde_json::Value::Array(items)) => {
                collect_records(items, serde_json::from_value::<Entry>)
            }
            Ok(other) => (
                Vec::new(),
                Some(DecodeError::NotASequence {
                    found: json_kind(&other),
                }),
            ),
            Err(e) => (Vec::new(), Some(DecodeError::Json(e))),
        },
    }
}

fn first_yaml_document(data: &[u8]) -> Result<serde_yaml::Value, serde_yaml::Error> {
    match serde_yaml::Deserializer::from_slice(data).next() {
        Some(document) => serde_yaml::Value::deserialize(document),
        None => Ok(serde_yaml::Value::Null),
    }
}

fn collect_records<V, E, F>(items: Vec<V>, decode: F) -> (Vec<Entry>, Option<DecodeError>)
where
    E: fmt::Display,
    F: Fn(V) -> Result<Entry, E>,
{
    let total = items.len();
    let mut entries = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match decode(item) {
            Ok(entry) => entries.push(entry),
            Err(e) => failures.push(RecordError {
                index,
                message: e.to_string(),
            }),
        }
    }

    let error = if failures.is_empty() {
        None
    } else {
        Some(DecodeError::Records { total, failures })
    };
    (entries, error)
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
