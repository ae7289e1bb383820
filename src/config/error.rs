//! Validation failures for configuration documents.

use thiserror::Error;

/// First violation found while validating a configuration against a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field with no default was absent.
    #[error("missing required field '{key}'")]
    MissingRequiredField { key: String },

    /// A value was present but could not be coerced to the declared type.
    #[error("invalid value for '{key}': expected {expected}, got '{got}'")]
    InvalidFieldType {
        key: String,
        expected: String,
        got: String,
    },

    /// More than one member of a mutually-exclusive group was set.
    #[error("conflicting fields in group '{group}': {}", keys.join(", "))]
    ConflictingFields { group: String, keys: Vec<String> },
}

impl ConfigError {
    /// The configuration key the error is about (first key for conflicts).
    pub fn key(&self) -> &str {
        match self {
            ConfigError::MissingRequiredField { key } => key,
            ConfigError::InvalidFieldType { key, .. } => key,
            ConfigError::ConflictingFields { keys, group } => {
                keys.first().map(String::as_str).unwrap_or(group)
            }
        }
    }
}
