//! PowerShell generation for profile modifications.
//!
//! Every modification becomes one CRLF-terminated line. Paths, names and
//! values are emitted as single-quoted PowerShell literals, so spaces and
//! `$` in registry paths are taken literally.

use super::model::{DirectoryMod, DocumentMod, FileAction, PackageMod, Profile, RegistryMod};
use std::collections::HashSet;

/// Line terminator for generated scripts (they run on Windows guests).
pub const LINE_END: &str = "\r\n";

/// Quote `text` as a PowerShell single-quoted string.
pub fn ps_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

impl RegistryMod {
    /// The PowerShell command for this change, including the line ending.
    pub fn powershell(&self) -> String {
        let command = match self {
            RegistryMod::Add {
                key,
                name,
                value,
                valuetype,
            } => format!(
                "New-ItemProperty -Path {} -Name {} -Value {} -PropertyType {}",
                ps_quote(key),
                ps_quote(name),
                ps_quote(value),
                ps_quote(valuetype)
            ),
            RegistryMod::Modify { key, name, value } => format!(
                "Set-ItemProperty -Path {} -Name {} -Value {}",
                ps_quote(key),
                ps_quote(name),
                ps_quote(value)
            ),
            RegistryMod::Delete {
                key,
                name: Some(name),
            } => format!(
                "Remove-ItemProperty -Path {} -Name {}",
                ps_quote(key),
                ps_quote(name)
            ),
            RegistryMod::Delete { key, name: None } => {
                format!("Remove-Item -Path {} -Recurse", ps_quote(key))
            }
        };
        command + LINE_END
    }
}

impl DirectoryMod {
    pub fn powershell(&self) -> String {
        match self.modtype {
            FileAction::Add => format!(
                "New-Item -Path {} -Type directory{}",
                ps_quote(&self.dirpath),
                LINE_END
            ),
            FileAction::Delete => format!("Remove-Item -Path {}{}", ps_quote(&self.dirpath), LINE_END),
        }
    }
}

impl DocumentMod {
    pub fn powershell(&self) -> String {
        match self.modtype {
            FileAction::Add => format!("New-Item -Path {}{}", ps_quote(&self.docpath), LINE_END),
            FileAction::Delete => format!("Remove-Item -Path {}{}", ps_quote(&self.docpath), LINE_END),
        }
    }
}

impl PackageMod {
    pub fn powershell(&self) -> String {
        format!("cinst {} -y{}", ps_quote(&self.package), LINE_END)
    }
}

impl Profile {
    /// Registry changes with duplicates removed.
    ///
    /// Entries that target the same (key, name) pair collapse to the last
    /// one declared, which keeps its position relative to the others.
    /// Registry paths and value names are compared case-insensitively, as
    /// Windows does.
    pub fn effective_registry(&self) -> Vec<&RegistryMod> {
        let mut seen = HashSet::new();
        let mut kept: Vec<&RegistryMod> = self
            .registry
            .iter()
            .rev()
            .filter(|entry| {
                seen.insert((
                    entry.key().to_ascii_lowercase(),
                    entry.name().map(str::to_ascii_lowercase),
                ))
            })
            .collect();
        kept.reverse();
        kept
    }

    /// Render the whole profile as a PowerShell script.
    ///
    /// Order: registry, directories, documents, packages.
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for entry in self.effective_registry() {
            script.push_str(&entry.powershell());
        }
        for entry in &self.directory {
            script.push_str(&entry.powershell());
        }
        for entry in &self.document {
            script.push_str(&entry.powershell());
        }
        for entry in &self.package {
            script.push_str(&entry.powershell());
        }
        script
    }
}
