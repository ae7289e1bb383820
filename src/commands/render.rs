//! Implementation of the `malboxes render` command.

use super::load_config;
use crate::cli::RenderArgs;
use malboxes::context::AppContext;
use malboxes::error::Result;
use malboxes::fs::write_new_file;
use malboxes::template::render;

pub fn cmd_render(ctx: &AppContext, args: RenderArgs) -> Result<()> {
    let store = ctx.template_store()?;
    let template = store.template(&args.template)?;
    let config = load_config(ctx, &args.config)?;

    let rendered = render(&template, &config)?;
    tracing::debug!(template = %args.template, bytes = rendered.as_str().len(), "rendered template");

    match args.output {
        Some(path) => {
            write_new_file(&path, rendered.as_str(), args.force)?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
