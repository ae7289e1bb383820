//! Configuration schema, loading and validation.
//!
//! A configuration document is read by the [`loader`] into a [`RawConfig`]
//! of string values, then [`validate`]d against a [`ConfigSchema`] to
//! produce an immutable [`NormalizedConfig`]. Unknown keys are not rejected;
//! they travel in the passthrough bucket for templates that need them.

pub mod builtin;
mod error;
pub mod loader;
mod normalized;
mod raw;
mod schema;
mod validator;
mod value;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use normalized::{NormalizedConfig, Resolved};
pub use raw::RawConfig;
pub use schema::{Condition, ConfigSchema, FieldSpec, FieldType, Requirement};
pub use validator::validate;
pub use value::Value;
