//! The validated, immutable configuration handed to the renderer.

use super::value::Value;
use crate::error::{MalboxesError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Configuration after defaults, coercion and group checks.
///
/// Only [`validate`](super::validate) constructs one; there are no mutators.
/// Every schema field is either in `values` or, when optional and absent
/// without a default, listed in `unset`. Keys the schema does not know are
/// kept verbatim in `passthrough`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedConfig {
    schema: String,
    values: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    unset: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    passthrough: BTreeMap<String, String>,
}

/// Where a key was found during lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    Value(&'a Value),
    /// Declared by the schema, optional, and absent.
    Unset,
    Passthrough(&'a str),
}

impl Resolved<'_> {
    /// Append the textual form to `out`; unset keys contribute nothing.
    pub fn write_to(&self, out: &mut String) {
        match self {
            Resolved::Value(Value::Text(text)) => out.push_str(text),
            Resolved::Value(value) => out.push_str(&value.to_string()),
            Resolved::Unset => {}
            Resolved::Passthrough(text) => out.push_str(text),
        }
    }
}

impl NormalizedConfig {
    pub(crate) fn new(
        schema: String,
        values: BTreeMap<String, Value>,
        unset: BTreeSet<String>,
        passthrough: BTreeMap<String, String>,
    ) -> Self {
        Self {
            schema,
            values,
            unset,
            passthrough,
        }
    }

    /// Name of the schema this configuration was validated against.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Typed value of a schema field, if it has one.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_integer(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_integer)
    }

    pub fn is_unset(&self, key: &str) -> bool {
        self.unset.contains(key)
    }

    pub fn passthrough(&self) -> &BTreeMap<String, String> {
        &self.passthrough
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Look a key up across typed values, unset fields and passthrough.
    pub fn resolve(&self, key: &str) -> Option<Resolved<'_>> {
        if let Some(value) = self.values.get(key) {
            return Some(Resolved::Value(value));
        }
        if self.unset.contains(key) {
            return Some(Resolved::Unset);
        }
        self.passthrough
            .get(key)
            .map(|text| Resolved::Passthrough(text.as_str()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.resolve(key).is_some()
    }

    /// Serialize to YAML for display.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            MalboxesError::UserError(format!("failed to serialize configuration to YAML: {}", e))
        })
    }
}
