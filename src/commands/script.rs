//! Implementation of the `malboxes script` command.

use crate::cli::ScriptArgs;
use malboxes::context::AppContext;
use malboxes::error::Result;
use malboxes::fs::write_new_file;
use malboxes::profile::Profile;

pub fn cmd_script(ctx: &AppContext, args: ScriptArgs) -> Result<()> {
    let path = ctx.profile_path(&args.profile)?;
    let profile = Profile::load(&path)?;
    if profile.is_empty() {
        tracing::warn!(path = %path.display(), "profile makes no changes");
    }

    let script = profile.to_script();
    match args.output {
        Some(output) => {
            write_new_file(&output, &script, args.force)?;
            eprintln!("Wrote {}", output.display());
        }
        None => print!("{}", script),
    }
    Ok(())
}
