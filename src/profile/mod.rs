//! VM customization profiles.
//!
//! - **Model**: the typed profile document (packages, documents,
//!   directories, registry changes)
//! - **Script**: PowerShell generation, one line per modification
//! - **User scripts**: per-profile scripts grown incrementally from the CLI

mod model;
mod script;
mod user_scripts;


pub use model::{DirectoryMod, DocumentMod, FileAction, PackageMod, Profile, RegistryMod};
pub use script::{ps_quote, LINE_END};
pub use user_scripts::{check_name, UserScripts};
