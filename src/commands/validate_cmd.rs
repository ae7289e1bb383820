//! Implementation of the `malboxes validate` command.
//!
//! Prints the normalized configuration as YAML so users can see the
//! defaults that were applied and which keys were passed through untouched.

use super::load_config;
use crate::cli::ValidateArgs;
use malboxes::context::AppContext;
use malboxes::error::Result;

pub fn cmd_validate(ctx: &AppContext, args: ValidateArgs) -> Result<()> {
    let config = load_config(ctx, &args.config)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
