//! Schema types describing the recognized configuration keys.
//!
//! A [`ConfigSchema`] is an ordered list of [`FieldSpec`]s. Declaration order
//! matters: the validator reports the first violation it meets while walking
//! the fields in this order.

use super::value::Value;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Free-form text.
    String,
    /// `true` or `false` (case-insensitive).
    Bool,
    /// Unsigned decimal integer.
    Integer,
    /// One of a fixed set of choices (case-sensitive).
    Enum(Vec<String>),
}

impl FieldType {
    /// Build an enum type from its choices.
    pub fn choices<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldType::Enum(choices.into_iter().map(Into::into).collect())
    }

    /// Coerce a raw string into this type, or `None` if it does not fit.
    pub fn coerce(&self, raw: &str) -> Option<Value> {
        let trimmed = raw.trim();
        match self {
            FieldType::String => Some(Value::Text(raw.to_string())),
            FieldType::Bool => {
                if trimmed.eq_ignore_ascii_case("true") {
                    Some(Value::Bool(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Some(Value::Bool(false))
                } else {
                    None
                }
            }
            FieldType::Integer => trimmed.parse::<u64>().ok().map(Value::Integer),
            FieldType::Enum(choices) => choices
                .iter()
                .find(|choice| choice.as_str() == trimmed)
                .map(|choice| Value::Text(choice.clone())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Bool => f.write_str("boolean"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Enum(choices) => write!(f, "one of: {}", choices.join(", ")),
        }
    }
}

/// An equality test against another field's resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub key: String,
    pub equals: Value,
}

impl Condition {
    pub fn new(key: impl Into<String>, equals: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            equals: equals.into(),
        }
    }

    /// True when `values` holds exactly the expected value for `key`.
    pub fn holds(&self, values: &BTreeMap<String, Value>) -> bool {
        values.get(&self.key) == Some(&self.equals)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.key, self.equals)
    }
}

/// Whether a field must be supplied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Requirement {
    #[default]
    Optional,
    Required,
    /// Required only while the condition holds.
    RequiredIf(Condition),
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Optional => f.write_str("optional"),
            Requirement::Required => f.write_str("required"),
            Requirement::RequiredIf(condition) => write!(f, "required if {}", condition),
        }
    }
}

/// Descriptor for a single configuration key.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldType,
    requirement: Requirement,
    default: Option<Value>,
    group: Option<String>,
    only_if: Option<Condition>,
    pattern: Option<Regex>,
}

impl FieldSpec {
    /// Create an optional field of the given type with no default.
    pub fn new(name: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            kind,
            requirement: Requirement::Optional,
            default: None,
            group: None,
            only_if: None,
            pattern: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn choice<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldType::choices(choices))
    }

    /// Mark the field as always required.
    pub fn required(mut self) -> Self {
        self.requirement = Requirement::Required;
        self
    }

    /// Require the field while `condition` holds.
    pub fn required_if(mut self, condition: Condition) -> Self {
        self.requirement = Requirement::RequiredIf(condition);
        self
    }

    /// Value used when the key is absent.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Place the field in a mutually-exclusive group.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Only allow a non-default value while `condition` holds.
    pub fn only_if(mut self, condition: Condition) -> Self {
        self.only_if = Some(condition);
        self
    }

    /// Constrain string values to a regular expression.
    pub fn pattern(mut self, pattern: &Regex) -> Self {
        self.pattern = Some(pattern.clone());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldType {
        &self.kind
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn exclusive_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn gate(&self) -> Option<&Condition> {
        self.only_if.as_ref()
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Human-readable type description, including any pattern.
    pub fn expected(&self) -> String {
        match &self.pattern {
            Some(pattern) => format!("{} matching /{}/", self.kind, pattern.as_str()),
            None => self.kind.to_string(),
        }
    }
}

/// Ordered set of recognized keys for one template family.
#[derive(Debug, Clone, Default)]
pub struct ConfigSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl ConfigSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field. Redeclaring a name replaces the earlier descriptor
    /// in place, keeping its original position.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Mutually-exclusive groups in order of first declaration, each with
    /// its members in declaration order.
    pub fn groups(&self) -> Vec<(&str, Vec<&FieldSpec>)> {
        let mut groups: Vec<(&str, Vec<&FieldSpec>)> = Vec::new();
        for field in &self.fields {
            let Some(group) = field.exclusive_group() else {
                continue;
            };
            match groups.iter_mut().find(|(name, _)| *name == group) {
                Some((_, members)) => members.push(field),
                None => groups.push((group, vec![field])),
            }
        }
        groups
    }
}
