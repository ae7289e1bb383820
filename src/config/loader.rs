//! Loading configuration documents from disk.
//!
//! Configuration files are JSON with JavaScript-style annotations so users
//! can toggle features by commenting lines in and out. Before parsing, the
//! loader strips `//` and `/* */` comments and drops trailing commas; YAML
//! files (`.yaml`/`.yml`) are parsed as-is. The validator never sees any of
//! this: it only receives a [`RawConfig`].

use super::raw::RawConfig;
use crate::error::{MalboxesError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Syntax of a configuration or profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON, with comments and trailing commas tolerated.
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension; anything but `.yaml`/`.yml`
    /// is treated as commented JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Remove comments and trailing commas from a JSON-like document.
///
/// String literals are left untouched. Newlines inside comments are kept so
/// parser error positions still point at the original line.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '}' | ']' => {
                drop_trailing_comma(&mut out);
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    out
}

fn drop_trailing_comma(out: &mut String) {
    let end = out.trim_end().len();
    if out[..end].ends_with(',') {
        out.remove(end - 1);
    }
}

/// Parse a document into any deserializable type.
///
/// `origin` names the document in error messages (usually its path).
pub fn parse_document<T: DeserializeOwned>(
    text: &str,
    format: DocumentFormat,
    origin: &str,
) -> Result<T> {
    match format {
        DocumentFormat::Json => serde_json::from_str(&strip_comments(text)).map_err(|e| {
            MalboxesError::ParseError(format!("failed to parse '{}': {}", origin, e))
        }),
        DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| {
            MalboxesError::ParseError(format!("failed to parse '{}': {}", origin, e))
        }),
    }
}

/// Read and parse a document, choosing the format from the file extension.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        MalboxesError::IoError(format!("failed to read '{}': {}", path.display(), e))
    })?;
    parse_document(&text, DocumentFormat::from_path(path), &path.display().to_string())
}

impl RawConfig {
    /// Load a configuration file (commented JSON or YAML).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let document: serde_json::Value = read_document(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration document");
        Self::from_document(document, &path.display().to_string())
    }

    /// Parse commented JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document = parse_document(text, DocumentFormat::Json, "<json>")?;
        Self::from_document(document, "<json>")
    }

    /// Parse YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let document = parse_document(text, DocumentFormat::Yaml, "<yaml>")?;
        Self::from_document(document, "<yaml>")
    }

    /// Flatten a parsed top-level object into string values.
    ///
    /// Scalars become their textual form, `null` counts as absent, and nested
    /// arrays or objects are kept as compact JSON text.
    pub fn from_document(document: serde_json::Value, origin: &str) -> Result<Self> {
        let serde_json::Value::Object(map) = document else {
            return Err(MalboxesError::ParseError(format!(
                "'{}' must contain a top-level object of key/value pairs",
                origin
            )));
        };

        let mut raw = RawConfig::new();
        for (key, value) in map {
            let text = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                nested => nested.to_string(),
            };
            raw.insert(key, text);
        }
        Ok(raw)
    }
}
