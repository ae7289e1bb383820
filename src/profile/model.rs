//! Profile document types.
//!
//! A profile customizes an analysis VM after installation:
//!
//! ```json
//! {
//!     "package":   [{"package": "thunderbird"}],
//!     "document":  [{"modtype": "add", "docpath": "C:\\Malboxes"}],
//!     "directory": [{"modtype": "add", "dirpath": "C:\\mlbxs\\"}],
//!     "registry":  [{"modtype": "delete", "key": "HKLM:\\...\\VBoxGuest"}]
//! }
//! ```
//!
//! Modification types are closed enums, so a `modify` on a directory or a
//! registry `add` without a value fails at parse time.

use crate::config::loader::{parse_document, read_document, DocumentFormat};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A Chocolatey package to install.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PackageMod {
    pub package: String,
}

/// Whether a file or directory is created or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Add,
    Delete,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileAction::Add => write!(f, "add"),
            FileAction::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentMod {
    pub modtype: FileAction,
    pub docpath: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DirectoryMod {
    pub modtype: FileAction,
    pub dirpath: String,
}

/// A registry change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "modtype", rename_all = "lowercase")]
pub enum RegistryMod {
    Add {
        key: String,
        name: String,
        value: String,
        valuetype: String,
    },
    Modify {
        key: String,
        name: String,
        value: String,
    },
    /// Removes a single value when `name` is given, otherwise the whole key.
    Delete {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl RegistryMod {
    pub fn key(&self) -> &str {
        match self {
            RegistryMod::Add { key, .. }
            | RegistryMod::Modify { key, .. }
            | RegistryMod::Delete { key, .. } => key,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            RegistryMod::Add { name, .. } | RegistryMod::Modify { name, .. } => Some(name),
            RegistryMod::Delete { name, .. } => name.as_deref(),
        }
    }
}

/// A parsed profile document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Profile {
    pub package: Vec<PackageMod>,
    pub document: Vec<DocumentMod>,
    pub directory: Vec<DirectoryMod>,
    pub registry: Vec<RegistryMod>,

    /// Top-level keys this version does not interpret, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Profile {
    /// Load a profile from a commented JSON or YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let profile: Profile = read_document(path)?;
        tracing::debug!(
            path = %path.display(),
            packages = profile.package.len(),
            registry = profile.registry.len(),
            "loaded profile"
        );
        Ok(profile)
    }

    /// Parse a profile from text in the given format.
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self> {
        parse_document(text, format, "<profile>")
    }

    /// True when the profile makes no changes.
    pub fn is_empty(&self) -> bool {
        self.package.is_empty()
            && self.document.is_empty()
            && self.directory.is_empty()
            && self.registry.is_empty()
    }
}
