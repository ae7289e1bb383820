//! Placeholder substitution.

use super::error::TemplateError;
use super::parse::{Segment, Template};
use crate::config::NormalizedConfig;
use std::fmt;

/// Fully substituted template output, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDescriptor {
    template: String,
    text: String,
}

impl RenderedDescriptor {
    /// Name of the template this was rendered from.
    pub fn template_name(&self) -> &str {
        &self.template
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for RenderedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Render a template against a validated configuration.
///
/// Rendering is all-or-nothing: the first placeholder whose key is neither a
/// schema field nor a passthrough key aborts with
/// [`TemplateError::UnresolvedPlaceholder`] and no partial output is
/// returned.
///
/// Values are inserted verbatim and never re-scanned. A value that itself
/// contains `{{ ... }}` appears as-is in the output, so the output is free
/// of delimiters only when the substituted values are.
///
/// # Examples
///
/// ```
/// use malboxes::config::{validate, ConfigSchema, FieldSpec, RawConfig};
/// use malboxes::template::{render, Template};
///
/// let schema = ConfigSchema::new("example")
///     .field(FieldSpec::string("username").required())
///     .field(FieldSpec::string("password").required());
/// let raw = RawConfig::from_pairs([("username", "malboxes"), ("password", "malboxes")]);
/// let config = validate(&raw, &schema).unwrap();
///
/// let template = Template::parse("inline", "user={{ username }} pass={{ password }}").unwrap();
/// let rendered = render(&template, &config).unwrap();
/// assert_eq!(rendered.as_str(), "user=malboxes pass=malboxes");
/// ```
pub fn render(
    template: &Template,
    config: &NormalizedConfig,
) -> Result<RenderedDescriptor, TemplateError> {
    let mut text = String::with_capacity(template.source_len());

    for segment in template.segments() {
        match segment {
            Segment::Literal(literal) => text.push_str(literal),
            Segment::Placeholder(placeholder) => match config.resolve(&placeholder.key) {
                Some(resolved) => resolved.write_to(&mut text),
                None => {
                    return Err(TemplateError::UnresolvedPlaceholder {
                        key: placeholder.key.clone(),
                        location: placeholder.location,
                    });
                }
            },
        }
    }

    Ok(RenderedDescriptor {
        template: template.name().to_string(),
        text,
    })
}

impl Template {
    /// Shorthand for [`render`].
    pub fn render(&self, config: &NormalizedConfig) -> Result<RenderedDescriptor, TemplateError> {
        render(self, config)
    }
}
