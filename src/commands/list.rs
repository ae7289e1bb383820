//! Implementation of the `malboxes list` command.

use malboxes::context::{AppContext, PROFILE_EXTENSIONS};
use malboxes::error::{MalboxesError, Result};
use malboxes::template::TemplateOrigin;
use std::path::Path;

pub fn cmd_list(ctx: &AppContext) -> Result<()> {
    let store = ctx.template_store()?;

    println!("Templates:");
    for name in store.names() {
        match store.origin(name) {
            Some(TemplateOrigin::File(path)) => println!("  {:<20} {}", name, path.display()),
            _ => println!("  {:<20} (built-in)", name),
        }
    }

    let profiles = profile_names(&ctx.profiles_dir())?;
    println!();
    if profiles.is_empty() {
        println!("No profiles in {}", ctx.profiles_dir().display());
    } else {
        println!("Profiles:");
        for name in profiles {
            println!("  {}", name);
        }
    }
    Ok(())
}

/// Names of profile documents in `dir`, sorted and without duplicates.
pub(crate) fn profile_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| {
        MalboxesError::IoError(format!("failed to read '{}': {}", dir.display(), e))
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| PROFILE_EXTENSIONS.contains(&ext))
        })
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .collect();
    names.sort();
    names.dedup();
    Ok(names)
}
