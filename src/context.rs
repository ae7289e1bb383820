//! Application directory resolution.
//!
//! All commands locate the user configuration, user templates, profiles and
//! generated scripts through [`AppContext`] so an explicit `--config-dir`
//! (or `MALBOXES_CONFIG_DIR`) relocates everything at once.
//!
//! Layout under the configuration directory:
//!
//! ```text
//! config.js        main configuration (commented JSON)
//! templates/       user templates, overriding built-ins by file stem
//! profiles/        profile documents (<name>.js / .json / .yaml)
//! scripts/         generated PowerShell user scripts
//! ```

use crate::error::{MalboxesError, Result};
use crate::fs::atomic_write_file;
use crate::template::TemplateStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Bundled example configuration, written as `config.js` on first use.
pub const EXAMPLE_CONFIG: &str = include_str!("../templates/config-example.js");

/// Bundled example profile.
pub const EXAMPLE_PROFILE: &str = include_str!("../templates/profile-example.js");

/// File name of the main configuration inside the configuration directory.
pub const CONFIG_FILE: &str = "config.js";

/// Profile document extensions, in lookup order.
pub const PROFILE_EXTENSIONS: &[&str] = &["js", "json", "yaml", "yml"];

/// Resolved application paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    /// Root configuration directory.
    pub config_dir: PathBuf,
}

impl AppContext {
    /// Resolve the configuration directory.
    ///
    /// An explicit directory wins; otherwise the platform configuration
    /// directory for "malboxes" is used (`~/.config/malboxes` on Linux).
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::from_root(dir));
        }

        let dirs = ProjectDirs::from("", "", "malboxes").ok_or_else(|| {
            MalboxesError::UserError(
                "could not determine a configuration directory; pass --config-dir".to_string(),
            )
        })?;
        Ok(Self::from_root(dirs.config_dir()))
    }

    /// Use `root` as the configuration directory.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        Self {
            config_dir: root.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.config_dir.join("templates")
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.config_dir.join("profiles")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.config_dir.join("scripts")
    }

    /// Create the directory layout. Existing directories are left alone.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [
            self.config_dir.clone(),
            self.templates_dir(),
            self.profiles_dir(),
            self.scripts_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                MalboxesError::IoError(format!(
                    "failed to create directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Write the example configuration if `config.js` does not exist.
    ///
    /// Returns `true` when a file was written.
    pub fn ensure_default_config(&self) -> Result<bool> {
        let path = self.config_path();
        if path.exists() {
            return Ok(false);
        }
        atomic_write_file(&path, EXAMPLE_CONFIG)?;
        tracing::info!(path = %path.display(), "wrote default configuration");
        Ok(true)
    }

    /// Built-in templates plus any in the user template directory.
    pub fn template_store(&self) -> Result<TemplateStore> {
        let mut store = TemplateStore::builtin();
        store.load_dir(&self.templates_dir())?;
        Ok(store)
    }

    /// Find a profile document by name.
    ///
    /// `name` may be a path to an existing file; otherwise the profiles
    /// directory is searched for `<name>.<ext>`.
    pub fn profile_path(&self, name: &str) -> Result<PathBuf> {
        let direct = Path::new(name);
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }

        let dir = self.profiles_dir();
        PROFILE_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", name, ext)))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                MalboxesError::UserError(format!(
                    "profile '{}' not found in '{}'",
                    name,
                    dir.display()
                ))
            })
    }
}
