//! Template parsing.
//!
//! # Syntax
//!
//! - `{{ key }}` - placeholder; whitespace around the key is ignored
//! - `{{ '...' }}` or `{{ "..." }}` - string literal, rendered verbatim; the
//!   way to emit delimiters, e.g. `{{ '{{' }}`
//! - Any other text, including a lone `{` or `}}`, is literal
//!
//! Backslashes carry no meaning, so Windows paths such as
//! `C:\Users\{{ username }}\Desktop` need no escaping.
//!
//! Keys start with a letter or underscore and continue with letters, digits,
//! `_`, `-` or `.`.

use super::error::{Location, TemplateError};
use regex::Regex;
use std::sync::LazyLock;

static KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("placeholder key pattern compiles")
});

/// A placeholder token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub key: String,
    pub location: Location,
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed template: literal text interleaved with placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
    source_len: usize,
}

impl Template {
    /// Parse template source text.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error in source order: an unterminated
    /// `{{`, an empty placeholder, or a placeholder whose body is not a key.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            if ch != '{' || !matches!(chars.peek(), Some((_, '{'))) {
                literal.push(ch);
                continue;
            }

            let location = Location::at(source, pos);
            let (token, resume) = scan_token(source, pos + 2, location)?;

            // Skip past the body and the closing braces
            while chars.next_if(|&(next, _)| next < resume).is_some() {}

            match token {
                Token::Text(text) => literal.push_str(text),
                Token::Key(key) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(Placeholder {
                        key: key.to_string(),
                        location,
                    }));
                }
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            name: name.into(),
            segments,
            source_len: source.len(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Byte length of the original source; a capacity hint for rendering.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Placeholders in source order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(placeholder),
            Segment::Literal(_) => None,
        })
    }

    /// Distinct keys referenced, in order of first use.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for placeholder in self.placeholders() {
            if !keys.contains(&placeholder.key.as_str()) {
                keys.push(&placeholder.key);
            }
        }
        keys
    }
}

enum Token<'a> {
    Key(&'a str),
    Text(&'a str),
}

/// Scan the body of a `{{ ... }}` token starting at byte `body_start`.
///
/// Returns the token and the byte offset just past its closing `}}`.
fn scan_token(
    source: &str,
    body_start: usize,
    location: Location,
) -> Result<(Token<'_>, usize), TemplateError> {
    let rest = &source[body_start..];
    let lead = rest.len() - rest.trim_start().len();
    let after_lead = &rest[lead..];

    if let Some(quote) = after_lead.chars().next().filter(|c| *c == '\'' || *c == '"') {
        let Some(text_len) = after_lead[1..].find(quote) else {
            return Err(TemplateError::Unterminated { location });
        };
        let text = &after_lead[1..1 + text_len];
        let tail = &after_lead[1 + text_len + 1..];
        let trimmed = tail.trim_start();
        if trimmed.starts_with("}}") {
            let close = body_start + lead + text_len + 2 + (tail.len() - trimmed.len());
            return Ok((Token::Text(text), close + 2));
        }
        return match rest.find("}}") {
            Some(body_len) => Err(TemplateError::InvalidPlaceholder {
                text: rest[..body_len].to_string(),
                location,
            }),
            None => Err(TemplateError::Unterminated { location }),
        };
    }

    let Some(body_len) = rest.find("}}") else {
        return Err(TemplateError::Unterminated { location });
    };
    let body = &rest[..body_len];
    let key = body.trim();
    if key.is_empty() {
        return Err(TemplateError::EmptyPlaceholder { location });
    }
    if !KEY.is_match(key) {
        return Err(TemplateError::InvalidPlaceholder {
            text: body.to_string(),
            location,
        });
    }
    Ok((Token::Key(key), body_start + body_len + 2))
}
