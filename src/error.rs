//! Error types for malboxes.
//!
//! Layer errors ([`ConfigError`], [`TemplateError`]) convert into
//! [`MalboxesError`] so commands can use `?` throughout; each variant maps
//! to a process exit code.

use crate::config::ConfigError;
use crate::exit_codes;
use crate::template::TemplateError;
use thiserror::Error;

/// Main error type for malboxes operations.
#[derive(Error, Debug)]
pub enum MalboxesError {
    /// User provided invalid arguments or the system is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// A configuration or profile document could not be parsed.
    #[error("{0}")]
    ParseError(String),

    /// Configuration did not satisfy its schema.
    #[error("Configuration invalid: {0}")]
    ConfigError(#[from] ConfigError),

    /// Template could not be parsed or rendered.
    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),

    /// Reading or writing a file failed.
    #[error("{0}")]
    IoError(String),
}

impl MalboxesError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            MalboxesError::UserError(_) => exit_codes::USER_ERROR,
            MalboxesError::ParseError(_) => exit_codes::VALIDATION_FAILURE,
            MalboxesError::ConfigError(_) => exit_codes::VALIDATION_FAILURE,
            MalboxesError::TemplateError(_) => exit_codes::TEMPLATE_FAILURE,
            MalboxesError::IoError(_) => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for malboxes operations.
pub type Result<T> = std::result::Result<T, MalboxesError>;
