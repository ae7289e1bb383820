//! Raw, untyped configuration as supplied by the user.

use std::collections::BTreeMap;

/// Key/value pairs read from a configuration document.
///
/// Values are kept as strings; typing happens in the validator. Inserting a
/// key that is already present replaces it, so the last declaration wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    entries: BTreeMap<String, String>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs; later pairs override earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut raw = Self::new();
        for (key, value) in pairs {
            raw.insert(key, value);
        }
        raw
    }

    /// Set a key, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for RawConfig {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
