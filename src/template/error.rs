//! Template parse and render failures.

use std::fmt;
use thiserror::Error;

/// Position of a token within a template source.
///
/// `line` and `column` are 1-based (column counts characters); `offset` is
/// the 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    /// Compute the location of byte `offset` in `source`.
    pub fn at(source: &str, offset: usize) -> Self {
        let before = &source[..offset];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Self {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
            offset,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Error type for template parsing and rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder references a key the configuration does not provide.
    #[error("unresolved placeholder '{key}' at {location}")]
    UnresolvedPlaceholder { key: String, location: Location },

    /// A `{{` was found without a matching `}}`.
    #[error("unterminated placeholder at {location}")]
    Unterminated { location: Location },

    /// `{{ }}` with nothing inside.
    #[error("empty placeholder at {location}")]
    EmptyPlaceholder { location: Location },

    /// The placeholder body is not a valid key name.
    #[error("invalid placeholder '{{{{{text}}}}}' at {location}")]
    InvalidPlaceholder { text: String, location: Location },
}

impl TemplateError {
    pub fn location(&self) -> Location {
        match self {
            TemplateError::UnresolvedPlaceholder { location, .. }
            | TemplateError::Unterminated { location }
            | TemplateError::EmptyPlaceholder { location }
            | TemplateError::InvalidPlaceholder { location, .. } => *location,
        }
    }
}
