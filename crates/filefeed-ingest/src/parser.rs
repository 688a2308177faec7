//! File-to-payload parsing
//!
//! Splits an uploaded file into the individual message payloads that get
//! produced to Kafka. The decoding strategy is picked from the file
//! extension:
//!
//! - `txt`: one payload per line, line terminators preserved
//! - `json`: the file is a single JSON object; one payload per top-level
//!   key, rendered as `"key, value"`
//! - `csv`: one payload per non-empty field, whitespace trimmed
//!
//! Any other extension yields an empty payload list rather than an error;
//! the upload allowlist keeps such files out of the normal flow, and a file
//! that matches no strategy simply has nothing to produce.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// One unit of broker traffic, derived from a line, field, or key of an
/// uploaded file. UTF-8 text; never mutated after creation.
pub type MessagePayload = String;

/// Errors produced while turning a file into payloads
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("file not found: {0}")]
    FileMissing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} is not valid UTF-8")]
    Utf8(PathBuf),

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON root of {path} must be an object, found {found}")]
    JsonRoot { path: PathBuf, found: &'static str },

    #[error("malformed CSV in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// Payload decoding strategy, keyed on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Text,
    Json,
    Csv,
}

impl PayloadFormat {
    /// Match the final extension, case-insensitively; `None` for anything
    /// unrecognized (including extensionless names).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(PayloadFormat::Text),
            "json" => Some(PayloadFormat::Json),
            "csv" => Some(PayloadFormat::Csv),
            _ => None,
        }
    }
}

/// Produce the payload sequence for a file.
///
/// Re-invoking on an unchanged file yields an identical sequence. A missing
/// file is an error even when the extension is unrecognized; an existing
/// file with an unrecognized extension yields an empty sequence.
pub fn parse_payloads(path: &Path) -> Result<Vec<MessagePayload>, ParseError> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ParseError::FileMissing(path.to_path_buf()));
        },
        Err(err) => {
            return Err(ParseError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        },
    };

    let Some(format) = PayloadFormat::from_path(path) else {
        debug!(path = %path.display(), "unrecognized extension, no payloads produced");
        return Ok(Vec::new());
    };

    match format {
        PayloadFormat::Text => text_payloads(&raw, path),
        PayloadFormat::Json => json_payloads(&raw, path),
        PayloadFormat::Csv => csv_payloads(&raw, path),
    }
}

/// One payload per line, terminators included as present in the source
fn text_payloads(raw: &[u8], path: &Path) -> Result<Vec<MessagePayload>, ParseError> {
    let text = std::str::from_utf8(raw).map_err(|_| ParseError::Utf8(path.to_path_buf()))?;
    Ok(text.split_inclusive('\n').map(str::to_owned).collect())
}

/// One payload per top-level key of a JSON object, as `"key, value"`
fn json_payloads(raw: &[u8], path: &Path) -> Result<Vec<MessagePayload>, ParseError> {
    let root: serde_json::Value = serde_json::from_slice(raw).map_err(|source| ParseError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let serde_json::Value::Object(map) = root else {
        return Err(ParseError::JsonRoot {
            path: path.to_path_buf(),
            found: json_type(&root),
        });
    };

    // Map iteration is ordered by key, so the payload order is stable across
    // runs even though the source object's own ordering is not.
    Ok(map
        .iter()
        .map(|(key, value)| format!("{}, {}", key, value_repr(value)))
        .collect())
}

/// One payload per non-empty field, trimmed, row by row
fn csv_payloads(raw: &[u8], path: &Path) -> Result<Vec<MessagePayload>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw);

    let mut payloads = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ParseError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        for field in record.iter() {
            let field = field.trim();
            if !field.is_empty() {
                payloads.push(field.to_string());
            }
        }
    }

    Ok(payloads)
}

/// Strings render without quotes; everything else as compact JSON
fn value_repr(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
