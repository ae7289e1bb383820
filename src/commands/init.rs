//! Implementation of the `malboxes init` command.
//!
//! Creates the configuration directory layout and seeds it with the example
//! configuration and profile. Existing files are never touched, so running
//! it again is harmless.

use malboxes::context::{AppContext, EXAMPLE_PROFILE};
use malboxes::error::Result;
use malboxes::fs::atomic_write_file;

/// File name of the seeded example profile.
pub const EXAMPLE_PROFILE_FILE: &str = "example.js";

pub fn cmd_init(ctx: &AppContext) -> Result<()> {
    ctx.ensure_layout()?;

    if ctx.ensure_default_config()? {
        println!("Created {}", ctx.config_path().display());
    } else {
        println!("Keeping existing {}", ctx.config_path().display());
    }

    let profile = ctx.profiles_dir().join(EXAMPLE_PROFILE_FILE);
    if !profile.exists() {
        atomic_write_file(&profile, EXAMPLE_PROFILE)?;
        println!("Created {}", profile.display());
    }

    println!();
    println!("Templates: {}", ctx.templates_dir().display());
    println!("Profiles:  {}", ctx.profiles_dir().display());
    println!("Scripts:   {}", ctx.scripts_dir().display());
    Ok(())
}
