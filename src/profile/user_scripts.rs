//! Per-profile PowerShell user scripts.
//!
//! Each profile owns `scripts/user/windows/<profile>.ps1`, built up one line
//! at a time by the `registry`, `directory`, `document` and `package`
//! commands. The provisioning step runs every script listed in
//! `scripts/windows/user_scripts.ps1`, so a profile's script is registered
//! there the first time it is written.

use super::script::LINE_END;
use crate::error::{MalboxesError, Result};
use crate::fs::atomic_write_file;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("name pattern compiles"));

/// Reject names that are unsafe to use as a file name.
///
/// `kind` names what is being checked in the error message ("profile",
/// "VM name", ...).
pub fn check_name(kind: &str, name: &str) -> Result<()> {
    if NAME.is_match(name) {
        Ok(())
    } else {
        Err(MalboxesError::UserError(format!(
            "invalid {} '{}': use letters, digits, '_', '-' or '.'",
            kind, name
        )))
    }
}

/// User scripts rooted at the `scripts/` configuration directory.
#[derive(Debug, Clone)]
pub struct UserScripts {
    root: PathBuf,
}

impl UserScripts {
    pub fn new(scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: scripts_dir.into(),
        }
    }

    /// Path of the script for `profile`.
    pub fn script_path(&self, profile: &str) -> PathBuf {
        self.root
            .join("user")
            .join("windows")
            .join(format!("{}.ps1", profile))
    }

    /// Path of the list of scripts run during provisioning.
    pub fn index_path(&self) -> PathBuf {
        self.root.join("windows").join("user_scripts.ps1")
    }

    /// Append one line to the profile's script and make sure the script is
    /// registered. Returns the script path.
    pub fn append(&self, profile: &str, line: &str) -> Result<PathBuf> {
        check_name("profile", profile)?;

        let path = self.script_path(profile);
        let mut content = read_or_empty(&path)?;
        content.push_str(line);
        if !line.ends_with(LINE_END) {
            content.push_str(LINE_END);
        }
        atomic_write_file(&path, &content)?;
        tracing::info!(profile, path = %path.display(), "appended to user script");

        self.register(profile)?;
        Ok(path)
    }

    /// Add `<profile>.ps1` to the index unless it is already listed.
    ///
    /// Returns `true` when the index changed.
    pub fn register(&self, profile: &str) -> Result<bool> {
        check_name("profile", profile)?;

        let entry = format!("{}.ps1", profile);
        let path = self.index_path();
        let mut content = read_or_empty(&path)?;

        if content.lines().any(|line| line.trim() == entry) {
            return Ok(false);
        }

        if !content.is_empty() && !content.ends_with('\n') {
            content.push_str(LINE_END);
        }
        content.push_str(&entry);
        content.push_str(LINE_END);
        atomic_write_file(&path, &content)?;
        tracing::debug!(profile, "registered user script");
        Ok(true)
    }

    /// Registered script names, in index order.
    pub fn registered(&self) -> Result<Vec<String>> {
        Ok(read_or_empty(&self.index_path())?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

fn read_or_empty(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(MalboxesError::IoError(format!(
            "failed to read '{}': {}",
            path.display(),
            e
        ))),
    }
}
