//! Command implementations for malboxes.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the configuration loading shared by `validate`,
//! `render` and `spin`.

mod init;
mod list;
mod profile_edit;
mod render;
mod schema;
mod script;
mod spin;
mod validate_cmd;


use crate::cli::{Command, ConfigArgs};
use malboxes::config::{builtin, validate, NormalizedConfig, RawConfig};
use malboxes::context::AppContext;
use malboxes::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(ctx),
        Command::List => list::cmd_list(ctx),
        Command::Schema => schema::cmd_schema(),
        Command::Validate(args) => validate_cmd::cmd_validate(ctx, args),
        Command::Render(args) => render::cmd_render(ctx, args),
        Command::Spin(args) => spin::cmd_spin(ctx, args),
        Command::Registry(args) => profile_edit::cmd_registry(ctx, args),
        Command::Directory(args) => profile_edit::cmd_directory(ctx, args),
        Command::Package(args) => profile_edit::cmd_package(ctx, args),
        Command::Document(args) => profile_edit::cmd_document(ctx, args),
        Command::Script(args) => script::cmd_script(ctx, args),
    }
}

/// Read the configuration file and apply `--set` overrides.
///
/// Without `--config` the file in the configuration directory is used; it is
/// created from the bundled example on first use.
pub(crate) fn load_raw(ctx: &AppContext, args: &ConfigArgs) -> Result<RawConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => {
            if ctx.ensure_default_config()? {
                eprintln!(
                    "Created default configuration at '{}'",
                    ctx.config_path().display()
                );
            }
            ctx.config_path()
        }
    };

    let mut raw = RawConfig::load(&path)?;
    if !args.overrides.is_empty() {
        tracing::debug!(count = args.overrides.len(), "applying --set overrides");
        raw.extend(args.overrides.iter().cloned());
    }
    Ok(raw)
}

/// Validate `raw` against the Windows VM schema.
pub(crate) fn normalize(raw: &RawConfig) -> Result<NormalizedConfig> {
    Ok(validate(raw, &builtin::windows_vm())?)
}

/// Load, override and validate the configuration.
pub(crate) fn load_config(ctx: &AppContext, args: &ConfigArgs) -> Result<NormalizedConfig> {
    normalize(&load_raw(ctx, args)?)
}
