//! CLI argument parsing for malboxes.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Malboxes: build and configure malware analysis VMs.
///
/// Validates a configuration document against the Windows VM schema and
/// renders provisioning templates (Vagrantfiles) from it. Profiles describe
/// guest customizations and compile to PowerShell scripts.
#[derive(Parser, Debug)]
#[command(name = "malboxes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration directory (defaults to the platform config dir).
    #[arg(long, global = true, env = "MALBOXES_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for malboxes.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the configuration directory layout.
    ///
    /// Writes the example configuration and profile when they are missing.
    Init,

    /// List available templates and profiles.
    List,

    /// Describe every field of the configuration schema.
    Schema,

    /// Validate the configuration and print the normalized result.
    Validate(ValidateArgs),

    /// Render a template with the configuration.
    Render(RenderArgs),

    /// Create a Vagrantfile for an analysis VM.
    ///
    /// The template is picked from the configured hypervisor unless
    /// --template is given.
    Spin(SpinArgs),

    /// Add a registry change to a profile's user script.
    Registry(RegistryArgs),

    /// Add a directory change to a profile's user script.
    Directory(FileModArgs),

    /// Add a Chocolatey package to a profile's user script.
    Package(PackageArgs),

    /// Add a file change to a profile's user script.
    Document(FileModArgs),

    /// Compile a profile document into a PowerShell script.
    Script(ScriptArgs),
}

/// Where the configuration comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (defaults to config.js in the config directory).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override a configuration key. May be repeated; later values win.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub overrides: Vec<(String, String)>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template name (see `malboxes list`).
    pub template: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Write to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists.
    #[arg(long, requires = "output")]
    pub force: bool,
}

/// Arguments for the `spin` command.
#[derive(Args, Debug)]
pub struct SpinArgs {
    /// Box (profile) the VM is created from.
    pub profile: String,

    /// Name of the VM.
    pub name: String,

    /// Template to render instead of the hypervisor default.
    #[arg(short, long)]
    pub template: Option<String>,

    /// Directory for the Vagrantfile (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Registry modification type.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryModType {
    Add,
    Modify,
    Delete,
}

/// File or directory modification type.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileModType {
    Add,
    Delete,
}

/// Arguments for the `registry` command.
#[derive(Args, Debug)]
pub struct RegistryArgs {
    /// Profile to modify.
    pub profile: String,

    /// Type of modification.
    #[arg(value_enum)]
    pub modtype: RegistryModType,

    /// Registry key path, e.g. HKLM:\Software\Lab.
    pub key: String,

    /// Value name (required for add and modify).
    pub name: Option<String>,

    /// Value data (required for add and modify).
    pub value: Option<String>,

    /// Value type for add, e.g. String or DWord.
    pub valuetype: Option<String>,
}

/// Arguments for the `directory` and `document` commands.
#[derive(Args, Debug)]
pub struct FileModArgs {
    /// Profile to modify.
    pub profile: String,

    /// Type of modification.
    #[arg(value_enum)]
    pub modtype: FileModType,

    /// Path on the guest.
    pub path: String,
}

/// Arguments for the `package` command.
#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Profile to modify.
    pub profile: String,

    /// Chocolatey package name.
    pub package: String,
}

/// Arguments for the `script` command.
#[derive(Args, Debug)]
pub struct ScriptArgs {
    /// Profile name (looked up in the profiles directory) or path.
    pub profile: String,

    /// Write to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists.
    #[arg(long, requires = "output")]
    pub force: bool,
}

/// Parse `KEY=VALUE`; the value may itself contain `=`.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_init() {
        let cli = Cli::try_parse_from(["malboxes", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init));
        assert!(!cli.debug);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["malboxes", "list", "-d", "--config-dir", "/tmp/mb"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/mb")));
    }

    #[test]
    fn test_parse_render_with_overrides() {
        let cli = Cli::try_parse_from([
            "malboxes",
            "render",
            "analyst_single",
            "-c",
            "lab.js",
            "--set",
            "name=Cryptolocker_XYZ",
            "--set",
            "password=a=b",
            "-o",
            "Vagrantfile",
        ])
        .unwrap();

        let Command::Render(args) = cli.command else {
            panic!("Expected Render command");
        };
        assert_eq!(args.template, "analyst_single");
        assert_eq!(args.config.config, Some(PathBuf::from("lab.js")));
        assert_eq!(
            args.config.overrides,
            vec![
                ("name".to_string(), "Cryptolocker_XYZ".to_string()),
                ("password".to_string(), "a=b".to_string()),
            ]
        );
        assert_eq!(args.output, Some(PathBuf::from("Vagrantfile")));
        assert!(!args.force);
    }

    #[test]
    fn test_parse_set_requires_equals() {
        assert!(Cli::try_parse_from(["malboxes", "validate", "--set", "trial"]).is_err());
        assert!(Cli::try_parse_from(["malboxes", "validate", "--set", "=x"]).is_err());
    }

    #[test]
    fn test_parse_force_requires_output() {
        assert!(Cli::try_parse_from(["malboxes", "render", "box_win", "--force"]).is_err());
    }

    #[test]
    fn test_parse_spin() {
        let cli = Cli::try_parse_from([
            "malboxes",
            "spin",
            "win10_64_analyst",
            "Cryptolocker_XYZ",
            "--dir",
            "/tmp/vm",
        ])
        .unwrap();

        let Command::Spin(args) = cli.command else {
            panic!("Expected Spin command");
        };
        assert_eq!(args.profile, "win10_64_analyst");
        assert_eq!(args.name, "Cryptolocker_XYZ");
        assert_eq!(args.dir, Some(PathBuf::from("/tmp/vm")));
        assert!(args.template.is_none());
    }

    #[test]
    fn test_parse_registry_delete_without_name() {
        let cli = Cli::try_parse_from([
            "malboxes",
            "registry",
            "lab",
            "delete",
            r"HKLM:\SYSTEM\ControlSet001\Services\VBoxSF",
        ])
        .unwrap();

        let Command::Registry(args) = cli.command else {
            panic!("Expected Registry command");
        };
        assert_eq!(args.modtype, RegistryModType::Delete);
        assert!(args.name.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_modtype() {
        assert!(Cli::try_parse_from(["malboxes", "directory", "lab", "modify", "C:\\x"]).is_err());
    }

    #[test]
    fn test_parse_package_and_document() {
        let cli = Cli::try_parse_from(["malboxes", "package", "lab", "thunderbird"]).unwrap();
        assert!(matches!(cli.command, Command::Package(ref a) if a.package == "thunderbird"));

        let cli =
            Cli::try_parse_from(["malboxes", "document", "lab", "add", "C:\\notes.txt"]).unwrap();
        assert!(matches!(cli.command, Command::Document(ref a) if a.modtype == FileModType::Add));
    }
}
