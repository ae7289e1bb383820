//! Named template lookup.
//!
//! The built-in Vagrantfile templates are compiled into the binary. A user
//! template directory can add new templates or override built-ins: every
//! file whose name matches one of [`TEMPLATE_GLOBS`] is registered under its
//! file stem.

use super::parse::Template;
use crate::error::{MalboxesError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name patterns recognized as templates in a template directory.
pub const TEMPLATE_GLOBS: &[&str] = &["*.rb", "*.json", "*.xml", "*.ps1", "*.tmpl", "Vagrantfile*"];

const BUILTIN: &[(&str, &str)] = &[
    (
        "analyst_aws",
        include_str!("../../templates/vagrantfiles/analyst_aws.rb"),
    ),
    (
        "analyst_single",
        include_str!("../../templates/vagrantfiles/analyst_single.rb"),
    ),
    (
        "analyst_vsphere",
        include_str!("../../templates/vagrantfiles/analyst_vsphere.rb"),
    ),
    (
        "box_win",
        include_str!("../../templates/vagrantfiles/box_win.rb"),
    ),
];

/// Where a template's source came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    Builtin,
    File(PathBuf),
}

#[derive(Debug, Clone)]
struct Entry {
    origin: TemplateOrigin,
    source: String,
}

/// A read-only collection of template sources keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    entries: BTreeMap<String, Entry>,
}

impl TemplateStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding only the built-in templates.
    pub fn builtin() -> Self {
        let mut store = Self::new();
        for (name, source) in BUILTIN {
            store.entries.insert(
                (*name).to_string(),
                Entry {
                    origin: TemplateOrigin::Builtin,
                    source: (*source).to_string(),
                },
            );
        }
        store
    }

    /// Register a template source, replacing any template with the same name.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>, origin: TemplateOrigin) {
        self.entries.insert(
            name.into(),
            Entry {
                origin,
                source: source.into(),
            },
        );
    }

    /// Register every template file in `dir`, returning how many were added.
    ///
    /// Files are visited in path order, so when two files share a stem the
    /// later one wins. A missing directory adds nothing.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "template directory not present");
            return Ok(0);
        }

        let matcher = template_matcher()?;
        let read_dir = fs::read_dir(dir).map_err(|e| {
            MalboxesError::IoError(format!(
                "failed to read template directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let mut paths: Vec<PathBuf> = read_dir
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .is_some_and(|file_name| matcher.is_match(Path::new(file_name)))
            })
            .collect();
        paths.sort();

        let mut added = 0;
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(|e| {
                MalboxesError::IoError(format!(
                    "failed to read template '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            tracing::debug!(name = stem, path = %path.display(), "registered template");
            self.insert(stem.to_string(), source, TemplateOrigin::File(path.clone()));
            added += 1;
        }

        Ok(added)
    }

    /// Template names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn origin(&self, name: &str) -> Option<&TemplateOrigin> {
        self.entries.get(name).map(|entry| &entry.origin)
    }

    pub fn source(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|entry| entry.source.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the named template.
    pub fn template(&self, name: &str) -> Result<Template> {
        let source = self.source(name).ok_or_else(|| {
            MalboxesError::UserError(format!(
                "unknown template '{}'. Available templates: {}",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })?;
        Ok(Template::parse(name, source)?)
    }
}

fn template_matcher() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in TEMPLATE_GLOBS {
        let glob = Glob::new(pattern).map_err(|e| {
            MalboxesError::UserError(format!("invalid template glob '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| MalboxesError::UserError(format!("failed to build template globs: {}", e)))
}
