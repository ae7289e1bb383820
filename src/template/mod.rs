//! Provisioning templates.
//!
//! - **Parse**: split template text into literals and `{{ key }}` placeholders
//! - **Render**: substitute placeholders from a [`NormalizedConfig`](crate::config::NormalizedConfig)
//! - **Store**: look templates up by name (built-in or from a directory)
//!
//! Rendering fails rather than leaving a placeholder unresolved or
//! substituting an empty string for an unknown key.

mod error;
mod parse;
mod render;
mod store;


pub use error::{Location, TemplateError};
pub use parse::{Placeholder, Segment, Template};
pub use render::{render, RenderedDescriptor};
pub use store::{TemplateOrigin, TemplateStore, TEMPLATE_GLOBS};
