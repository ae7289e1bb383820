//! Implementations of the `registry`, `directory`, `package` and `document`
//! commands.
//!
//! Each builds one profile modification, turns it into its PowerShell line
//! and appends that line to the profile's user script.

use crate::cli::{FileModArgs, FileModType, PackageArgs, RegistryArgs, RegistryModType};
use malboxes::context::AppContext;
use malboxes::error::{MalboxesError, Result};
use malboxes::profile::{DirectoryMod, DocumentMod, FileAction, PackageMod, RegistryMod, UserScripts};

pub fn cmd_registry(ctx: &AppContext, args: RegistryArgs) -> Result<()> {
    let modification = registry_mod(args.modtype, args.key, args.name, args.value, args.valuetype)?;
    append(ctx, &args.profile, &modification.powershell())
}

pub fn cmd_directory(ctx: &AppContext, args: FileModArgs) -> Result<()> {
    let modification = DirectoryMod {
        modtype: file_action(args.modtype),
        dirpath: args.path,
    };
    append(ctx, &args.profile, &modification.powershell())
}

pub fn cmd_document(ctx: &AppContext, args: FileModArgs) -> Result<()> {
    let modification = DocumentMod {
        modtype: file_action(args.modtype),
        docpath: args.path,
    };
    append(ctx, &args.profile, &modification.powershell())
}

pub fn cmd_package(ctx: &AppContext, args: PackageArgs) -> Result<()> {
    let modification = PackageMod {
        package: args.package,
    };
    append(ctx, &args.profile, &modification.powershell())
}

fn append(ctx: &AppContext, profile: &str, line: &str) -> Result<()> {
    let path = UserScripts::new(ctx.scripts_dir()).append(profile, line)?;
    println!("Adding: {}", line.trim_end());
    tracing::debug!(path = %path.display(), "user script updated");
    Ok(())
}

fn file_action(modtype: FileModType) -> FileAction {
    match modtype {
        FileModType::Add => FileAction::Add,
        FileModType::Delete => FileAction::Delete,
    }
}

/// Build a registry modification, checking that the positional arguments
/// the modification type needs were given.
pub(crate) fn registry_mod(
    modtype: RegistryModType,
    key: String,
    name: Option<String>,
    value: Option<String>,
    valuetype: Option<String>,
) -> Result<RegistryMod> {
    let verb = match modtype {
        RegistryModType::Add => "add",
        RegistryModType::Modify => "modify",
        RegistryModType::Delete => "delete",
    };
    let need = |arg: Option<String>, what: &str| {
        arg.ok_or_else(|| MalboxesError::UserError(format!("registry {} requires {}", verb, what)))
    };

    Ok(match modtype {
        RegistryModType::Add => RegistryMod::Add {
            key,
            name: need(name, "NAME")?,
            value: need(value, "VALUE")?,
            valuetype: need(valuetype, "VALUETYPE")?,
        },
        RegistryModType::Modify => RegistryMod::Modify {
            key,
            name: need(name, "NAME")?,
            value: need(value, "VALUE")?,
        },
        RegistryModType::Delete => RegistryMod::Delete { key, name },
    })
}
