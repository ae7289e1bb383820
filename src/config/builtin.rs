//! Built-in schemas.
//!
//! The Windows VM schema mirrors the keys of the bundled example
//! configuration (`templates/config-example.js`). Hypervisor-specific
//! connection settings are gated on `hypervisor` so that a VirtualBox setup
//! cannot silently carry half-configured vSphere or AWS credentials.

use super::schema::{Condition, ConfigSchema, FieldSpec};
use regex::Regex;
use std::sync::LazyLock;

/// Name of the Windows VM schema.
pub const WINDOWS_VM: &str = "windows_vm";

/// Supported hypervisors, in the order they are documented.
pub const HYPERVISORS: &[&str] = &["virtualbox", "vsphere", "aws"];

/// Packages installed through Chocolatey when the user does not override them.
pub const DEFAULT_CHOCO_PACKAGES: &str =
    "ghidra x64dbg.portable dnspy ollydbg sysinternals windbg 7zip putty wireshark winpcap";

static PRODUCT_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]{5}(-[A-Z0-9]{5}){4}$").expect("product key pattern compiles")
});

static LOCALE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}-[A-Z]{2}$").expect("locale pattern compiles"));

const VSPHERE_REQUIRED: &[&str] = &[
    "remote_host",
    "remote_datastore",
    "remote_username",
    "remote_password",
    "vsphere_host",
    "vsphere_user",
    "vsphere_password",
];

const AWS_REQUIRED: &[&str] = &[
    "aws_access_key",
    "aws_secret_key",
    "aws_security_group",
    "aws_keypair",
    "aws_ami_id",
];

/// Look up a built-in schema by name.
pub fn schema_by_name(name: &str) -> Option<ConfigSchema> {
    match name {
        WINDOWS_VM => Some(windows_vm()),
        _ => None,
    }
}

/// Schema for Windows analysis VM configuration.
pub fn windows_vm() -> ConfigSchema {
    let registered = Condition::new("trial", false);
    let on_vsphere = Condition::new("hypervisor", "vsphere");
    let on_aws = Condition::new("hypervisor", "aws");

    let mut schema = ConfigSchema::new(WINDOWS_VM)
        .field(FieldSpec::string("iso_path").group("iso_source"))
        .field(FieldSpec::string("iso_url").group("iso_source"))
        .field(FieldSpec::boolean("trial").with_default(true))
        .field(
            FieldSpec::string("product_key")
                .required_if(registered.clone())
                .only_if(registered)
                .pattern(&PRODUCT_KEY),
        )
        .field(FieldSpec::string("username").required())
        .field(FieldSpec::string("password").required())
        .field(FieldSpec::string("computername").with_default("dirty"))
        .field(FieldSpec::integer("disk_size").with_default(20480u64))
        .field(FieldSpec::string("profile"))
        .field(FieldSpec::string("input_locale").pattern(&LOCALE))
        .field(FieldSpec::choice("hypervisor", HYPERVISORS.iter().copied()).with_default("virtualbox"));

    for key in VSPHERE_REQUIRED {
        schema = schema.field(
            FieldSpec::string(*key)
                .required_if(on_vsphere.clone())
                .only_if(on_vsphere.clone()),
        );
    }

    schema = schema
        .field(
            FieldSpec::string("vsphere_clone_from_vm")
                .with_default("packer-test")
                .only_if(on_vsphere.clone()),
        )
        .field(
            FieldSpec::string("vsphere_name")
                .with_default("malboxestest")
                .only_if(on_vsphere.clone()),
        )
        .field(
            FieldSpec::boolean("vsphere_insecure")
                .with_default(true)
                .only_if(on_vsphere),
        );

    for key in AWS_REQUIRED {
        schema = schema.field(
            FieldSpec::string(*key)
                .required_if(on_aws.clone())
                .only_if(on_aws.clone()),
        );
    }

    schema
        .field(FieldSpec::string("proxy"))
        .field(FieldSpec::boolean("windows_defender").with_default(false))
        .field(FieldSpec::boolean("windows_updates").with_default(false))
        .field(FieldSpec::string("choco_packages").with_default(DEFAULT_CHOCO_PACKAGES))
        .field(FieldSpec::string("ida_path"))
        .field(FieldSpec::string("tools_path"))
}

/// Vagrantfile template used by `spin` for a hypervisor.
pub fn analyst_template_for(hypervisor: &str) -> Option<&'static str> {
    match hypervisor {
        "virtualbox" => Some("analyst_single"),
        "vsphere" => Some("analyst_vsphere"),
        "aws" => Some("analyst_aws"),
        _ => None,
    }
}
