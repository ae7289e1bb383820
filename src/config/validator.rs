//! Schema validation: RawConfig in, NormalizedConfig out.
//!
//! Validation runs in four deterministic passes and stops at the first
//! violation:
//!
//! 1. Per field, in declaration order: coerce supplied values, apply
//!    defaults, and reject absent unconditionally-required fields.
//! 2. Conditional requirements (`required_if`), in declaration order.
//! 3. Mutually-exclusive groups, in order of first declaration.
//! 4. Gated fields (`only_if`), in declaration order.
//!
//! An empty string counts as absent, so example files can list keys with
//! `""` placeholders without tripping requirements or group checks.

use super::error::ConfigError;
use super::normalized::NormalizedConfig;
use super::raw::RawConfig;
use super::schema::{ConfigSchema, FieldSpec, Requirement};
use super::value::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Validate a raw configuration against a schema.
pub fn validate(raw: &RawConfig, schema: &ConfigSchema) -> Result<NormalizedConfig, ConfigError> {
    let mut values: BTreeMap<String, Value> = BTreeMap::new();
    let mut unset = BTreeSet::new();
    let mut supplied = BTreeSet::new();

    for field in schema.fields() {
        match raw.get(field.name()).filter(|text| !text.is_empty()) {
            Some(text) => {
                let value = coerce(field, text)?;
                supplied.insert(field.name());
                values.insert(field.name().to_string(), value);
            }
            None => match (field.default_value(), field.requirement()) {
                (Some(default), _) => {
                    values.insert(field.name().to_string(), default.clone());
                }
                (None, Requirement::Required) => {
                    return Err(ConfigError::MissingRequiredField {
                        key: field.name().to_string(),
                    });
                }
                (None, _) => {
                    unset.insert(field.name().to_string());
                }
            },
        }
    }

    for field in schema.fields() {
        if let Requirement::RequiredIf(condition) = field.requirement()
            && condition.holds(&values)
            && !values.contains_key(field.name())
        {
            return Err(ConfigError::MissingRequiredField {
                key: field.name().to_string(),
            });
        }
    }

    for (group, members) in schema.groups() {
        let set: Vec<String> = members
            .iter()
            .filter(|field| is_set(field, &values, &supplied))
            .map(|field| field.name().to_string())
            .collect();
        if set.len() > 1 {
            return Err(ConfigError::ConflictingFields {
                group: group.to_string(),
                keys: set,
            });
        }
    }

    for field in schema.fields() {
        if let Some(gate) = field.gate()
            && is_set(field, &values, &supplied)
            && !gate.holds(&values)
        {
            // A defaulted condition key is not something the user wrote
            let mut keys = Vec::with_capacity(2);
            if supplied.contains(gate.key.as_str()) {
                keys.push(gate.key.clone());
            }
            keys.push(field.name().to_string());
            return Err(ConfigError::ConflictingFields {
                group: gate.key.clone(),
                keys,
            });
        }
    }

    let passthrough: BTreeMap<String, String> = raw
        .iter()
        .filter(|(key, _)| !schema.contains(key))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    tracing::debug!(
        schema = schema.name(),
        values = values.len(),
        unset = unset.len(),
        passthrough = passthrough.len(),
        "configuration validated"
    );

    Ok(NormalizedConfig::new(
        schema.name().to_string(),
        values,
        unset,
        passthrough,
    ))
}

fn coerce(field: &FieldSpec, text: &str) -> Result<Value, ConfigError> {
    let invalid = || ConfigError::InvalidFieldType {
        key: field.name().to_string(),
        expected: field.expected(),
        got: text.to_string(),
    };

    let value = field.kind().coerce(text).ok_or_else(invalid)?;
    if let Some(pattern) = field.regex()
        && !pattern.is_match(text)
    {
        return Err(invalid());
    }
    Ok(value)
}

/// A field counts as set when the user supplied it with a value other than
/// its default.
fn is_set(field: &FieldSpec, values: &BTreeMap<String, Value>, supplied: &BTreeSet<&str>) -> bool {
    supplied.contains(field.name()) && values.get(field.name()) != field.default_value()
}
