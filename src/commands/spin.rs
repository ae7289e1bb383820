//! Implementation of the `malboxes spin` command.
//!
//! Renders an analyst Vagrantfile for a VM called NAME built from the box
//! PROFILE. The box and VM names are added to the configuration as
//! `template_name` and `name` before validation, so `--set` cannot
//! override them.

use super::{load_raw, normalize};
use crate::cli::SpinArgs;
use malboxes::config::builtin;
use malboxes::context::AppContext;
use malboxes::error::{MalboxesError, Result};
use malboxes::fs::write_new_file;
use malboxes::profile::check_name;
use std::path::PathBuf;

/// File name vagrant looks for.
pub const VAGRANTFILE: &str = "Vagrantfile";

pub fn cmd_spin(ctx: &AppContext, args: SpinArgs) -> Result<()> {
    check_name("profile", &args.profile)?;
    check_name("VM name", &args.name)?;

    let dir = match args.dir {
        Some(dir) => dir,
        None => current_dir()?,
    };
    let target = dir.join(VAGRANTFILE);
    // Early exit only; write_new_file makes the authoritative check
    if target.exists() {
        return Err(MalboxesError::UserError(format!(
            "'{}' already exists. Please move it away.",
            target.display()
        )));
    }

    let mut raw = load_raw(ctx, &args.config)?;
    raw.insert("template_name", args.profile.as_str());
    raw.insert("name", args.name.as_str());
    let config = normalize(&raw)?;

    let template_name = match args.template {
        Some(name) => name,
        None => {
            let hypervisor = config.get_str("hypervisor").unwrap_or("virtualbox");
            builtin::analyst_template_for(hypervisor)
                .ok_or_else(|| {
                    MalboxesError::UserError(format!(
                        "no analyst template for hypervisor '{}'",
                        hypervisor
                    ))
                })?
                .to_string()
        }
    };

    let template = ctx.template_store()?.template(&template_name)?;
    let rendered = template.render(&config)?;
    write_new_file(&target, rendered.as_str(), false)?;

    tracing::info!(template = %template_name, path = %target.display(), "generated Vagrantfile");
    println!("Vagrantfile generated in {}.", dir.display());
    println!("Issue a `vagrant up` there to get started with your VM.");
    Ok(())
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        MalboxesError::UserError(format!("failed to get current working directory: {}", e))
    })
}
