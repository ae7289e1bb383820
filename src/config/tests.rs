//! Tests for configuration validation.

use crate::config::builtin::{self, DEFAULT_CHOCO_PACKAGES};
use crate::config::{
    validate, Condition, ConfigError, ConfigSchema, FieldSpec, RawConfig, Resolved, Value,
};
use crate::context::EXAMPLE_CONFIG;

fn license_schema() -> ConfigSchema {
    ConfigSchema::new("license")
        .field(FieldSpec::boolean("trial").with_default(true))
        .field(FieldSpec::string("product_key").required_if(Condition::new("trial", false)))
}

fn minimal_windows() -> RawConfig {
    RawConfig::from_pairs([("username", "malboxes"), ("password", "malboxes")])
}

// =============================================================================
// Generic validation semantics
// =============================================================================

#[test]
fn test_supplied_values_are_coerced() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::string("name").required())
        .field(FieldSpec::boolean("gui"))
        .field(FieldSpec::integer("memory"))
        .field(FieldSpec::choice("mode", ["a", "b"]));
    let raw = RawConfig::from_pairs([
        ("name", "vm"),
        ("gui", "TRUE"),
        ("memory", "4096"),
        ("mode", "b"),
    ]);

    let config = validate(&raw, &schema).unwrap();

    assert_eq!(config.get("name"), Some(&Value::from("vm")));
    assert_eq!(config.get_bool("gui"), Some(true));
    assert_eq!(config.get_integer("memory"), Some(4096));
    assert_eq!(config.get_str("mode"), Some("b"));
    assert_eq!(config.schema_name(), "s");
}

#[test]
fn test_absent_optional_uses_default_or_unset() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::boolean("gui").with_default(false))
        .field(FieldSpec::string("proxy"));

    let config = validate(&RawConfig::new(), &schema).unwrap();

    assert_eq!(config.get_bool("gui"), Some(false));
    assert!(config.get("proxy").is_none());
    assert!(config.is_unset("proxy"));
    assert_eq!(config.resolve("proxy"), Some(Resolved::Unset));
}

#[test]
fn test_missing_required_field() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::string("username").required())
        .field(FieldSpec::string("password").required());
    let raw = RawConfig::from_pairs([("username", "malboxes")]);

    let err = validate(&raw, &schema).unwrap_err();
    assert_eq!(
        err,
        ConfigError::MissingRequiredField {
            key: "password".to_string()
        }
    );
}

#[test]
fn test_required_with_default_never_missing() {
    let schema = ConfigSchema::new("s").field(FieldSpec::string("user").required().with_default("root"));
    let config = validate(&RawConfig::new(), &schema).unwrap();
    assert_eq!(config.get_str("user"), Some("root"));
}

#[test]
fn test_empty_string_counts_as_absent() {
    let schema = ConfigSchema::new("s").field(FieldSpec::string("username").required());
    let raw = RawConfig::from_pairs([("username", "")]);

    let err = validate(&raw, &schema).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRequiredField { key } if key == "username"));
}

#[test]
fn test_first_violation_in_declaration_order() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::boolean("b_flag"))
        .field(FieldSpec::string("a_required").required());
    let raw = RawConfig::from_pairs([("b_flag", "nope")]);

    // b_flag is declared first, so its type error wins over the missing field
    let err = validate(&raw, &schema).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFieldType { ref key, .. } if key == "b_flag"));
}

#[test]
fn test_invalid_bool() {
    let raw = RawConfig::from_pairs([("trial", "maybe")]);
    let err = validate(&raw, &license_schema()).unwrap_err();

    assert_eq!(
        err,
        ConfigError::InvalidFieldType {
            key: "trial".to_string(),
            expected: "boolean".to_string(),
            got: "maybe".to_string(),
        }
    );
}

#[test]
fn test_invalid_enum_lists_choices() {
    let schema = ConfigSchema::new("s").field(FieldSpec::choice("hypervisor", ["virtualbox", "vsphere"]));
    let raw = RawConfig::from_pairs([("hypervisor", "qemu")]);

    let err = validate(&raw, &schema).unwrap_err();
    match err {
        ConfigError::InvalidFieldType { expected, got, .. } => {
            assert_eq!(expected, "one of: virtualbox, vsphere");
            assert_eq!(got, "qemu");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_required_if_scenario() {
    let raw = RawConfig::from_pairs([("trial", "false")]);
    let err = validate(&raw, &license_schema()).unwrap_err();

    assert_eq!(
        err,
        ConfigError::MissingRequiredField {
            key: "product_key".to_string()
        }
    );
}

#[test]
fn test_required_if_not_triggered() {
    let config = validate(&RawConfig::new(), &license_schema()).unwrap();
    assert_eq!(config.get_bool("trial"), Some(true));
    assert!(config.is_unset("product_key"));
}

#[test]
fn test_required_if_condition_declared_after_field() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::string("host").required_if(Condition::new("remote", true)))
        .field(FieldSpec::boolean("remote").with_default(false));
    let raw = RawConfig::from_pairs([("remote", "true")]);

    let err = validate(&raw, &schema).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRequiredField { key } if key == "host"));
}

#[test]
fn test_exclusive_group_conflict() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::string("iso_path").group("iso_source"))
        .field(FieldSpec::string("iso_url").group("iso_source"));
    let raw = RawConfig::from_pairs([("iso_path", "/isos"), ("iso_url", "http://x/iso")]);

    let err = validate(&raw, &schema).unwrap_err();
    assert_eq!(
        err,
        ConfigError::ConflictingFields {
            group: "iso_source".to_string(),
            keys: vec!["iso_path".to_string(), "iso_url".to_string()],
        }
    );
}

#[test]
fn test_exclusive_group_single_member_ok() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::string("iso_path").group("iso_source"))
        .field(FieldSpec::string("iso_url").group("iso_source"));
    let raw = RawConfig::from_pairs([("iso_path", "/isos"), ("iso_url", "")]);

    let config = validate(&raw, &schema).unwrap();
    assert_eq!(config.get_str("iso_path"), Some("/isos"));
    assert!(config.is_unset("iso_url"));
}

#[test]
fn test_exclusive_group_ignores_values_equal_to_default() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::boolean("gui").with_default(true).group("display"))
        .field(FieldSpec::boolean("headless").with_default(false).group("display"));
    let raw = RawConfig::from_pairs([("gui", "true"), ("headless", "true")]);

    // gui matches its default, so only headless is really set
    let config = validate(&raw, &schema).unwrap();
    assert_eq!(config.get_bool("headless"), Some(true));
}

#[test]
fn test_gated_field_conflicts_when_condition_false() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::choice("hypervisor", ["virtualbox", "vsphere"]).with_default("virtualbox"))
        .field(FieldSpec::string("vsphere_host").only_if(Condition::new("hypervisor", "vsphere")));
    let raw = RawConfig::from_pairs([("vsphere_host", "vc.local")]);

    let err = validate(&raw, &schema).unwrap_err();
    assert_eq!(
        err,
        ConfigError::ConflictingFields {
            group: "hypervisor".to_string(),
            keys: vec!["vsphere_host".to_string()],
        }
    );
}

#[test]
fn test_gated_field_conflict_names_supplied_condition_key() {
    let schema = ConfigSchema::new("s")
        .field(FieldSpec::choice("hypervisor", ["virtualbox", "vsphere"]).with_default("virtualbox"))
        .field(FieldSpec::string("vsphere_host").only_if(Condition::new("hypervisor", "vsphere")));
    let raw = RawConfig::from_pairs([("hypervisor", "virtualbox"), ("vsphere_host", "vc.local")]);

    let err = validate(&raw, &schema).unwrap_err();
    assert_eq!(
        err,
        ConfigError::ConflictingFields {
            group: "hypervisor".to_string(),
            keys: vec!["hypervisor".to_string(), "vsphere_host".to_string()],
        }
    );
}

#[test]
fn test_unknown_keys_pass_through() {
    let raw = RawConfig::from_pairs([("trial", "true"), ("_comment", "hello"), ("name", "vm1")]);
    let config = validate(&raw, &license_schema()).unwrap();

    assert_eq!(config.passthrough().get("_comment").map(String::as_str), Some("hello"));
    assert_eq!(config.resolve("name"), Some(Resolved::Passthrough("vm1")));
    assert!(config.get("name").is_none());
}

#[test]
fn test_validation_is_deterministic() {
    let raw = RawConfig::from_pairs([("trial", "false"), ("product_key", "ABCDE")]);
    let schema = license_schema();
    assert_eq!(validate(&raw, &schema), validate(&raw, &schema));
}

// =============================================================================
// Built-in Windows VM schema
// =============================================================================

#[test]
fn test_example_config_validates() {
    let raw = RawConfig::from_json_str(EXAMPLE_CONFIG).unwrap();
    let config = validate(&raw, &builtin::windows_vm()).unwrap();

    assert_eq!(config.get_bool("trial"), Some(true));
    assert_eq!(config.get_str("username"), Some("malboxes"));
    assert_eq!(config.get_integer("disk_size"), Some(20480));
    assert_eq!(config.get_str("hypervisor"), Some("virtualbox"));
    assert_eq!(config.get_str("vsphere_clone_from_vm"), Some("packer-test"));
    assert_eq!(config.get_str("choco_packages"), Some(DEFAULT_CHOCO_PACKAGES));
    assert!(config.is_unset("remote_host"));
    assert!(config.passthrough().contains_key("_comment"));
}

#[test]
fn test_windows_defaults() {
    let config = validate(&minimal_windows(), &builtin::windows_vm()).unwrap();

    assert_eq!(config.get_str("computername"), Some("dirty"));
    assert_eq!(config.get_bool("windows_defender"), Some(false));
    assert_eq!(config.get_bool("windows_updates"), Some(false));
    assert_eq!(config.get_bool("vsphere_insecure"), Some(true));
    assert!(config.is_unset("ida_path"));
}

#[test]
fn test_windows_registered_requires_product_key() {
    let mut raw = minimal_windows();
    raw.insert("trial", "false");

    let err = validate(&raw, &builtin::windows_vm()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRequiredField { key } if key == "product_key"));

    raw.insert("product_key", "ABCDE-12345-FGHIJ-67890-KLMNO");
    let config = validate(&raw, &builtin::windows_vm()).unwrap();
    assert_eq!(config.get_str("product_key"), Some("ABCDE-12345-FGHIJ-67890-KLMNO"));
}

#[test]
fn test_windows_product_key_pattern() {
    let mut raw = minimal_windows();
    raw.insert("trial", "false");
    raw.insert("product_key", "not-a-key");

    let err = validate(&raw, &builtin::windows_vm()).unwrap_err();
    match err {
        ConfigError::InvalidFieldType { key, expected, .. } => {
            assert_eq!(key, "product_key");
            assert!(expected.starts_with("string matching"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_windows_product_key_with_trial_conflicts() {
    let mut raw = minimal_windows();
    raw.insert("product_key", "ABCDE-12345-FGHIJ-67890-KLMNO");

    let err = validate(&raw, &builtin::windows_vm()).unwrap_err();
    assert_eq!(
        err,
        ConfigError::ConflictingFields {
            group: "trial".to_string(),
            keys: vec!["product_key".to_string()],
        }
    );
}

#[test]
fn test_windows_vsphere_requires_connection_fields() {
    let mut raw = minimal_windows();
    raw.insert("hypervisor", "vsphere");

    let err = validate(&raw, &builtin::windows_vm()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRequiredField { key } if key == "remote_host"));
}

#[test]
fn test_windows_vsphere_fields_rejected_on_virtualbox() {
    let mut raw = minimal_windows();
    raw.insert("vsphere_host", "vcenter.lab");

    let err = validate(&raw, &builtin::windows_vm()).unwrap_err();
    assert!(matches!(err, ConfigError::ConflictingFields { ref group, .. } if group == "hypervisor"));
    assert_eq!(err.to_string(), "conflicting fields in group 'hypervisor': vsphere_host");
}

#[test]
fn test_windows_vsphere_complete() {
    let mut raw = minimal_windows();
    raw.extend([
        ("hypervisor", "vsphere"),
        ("remote_host", "esx01"),
        ("remote_datastore", "ds1"),
        ("remote_username", "root"),
        ("remote_password", "secret"),
        ("vsphere_host", "vcenter.lab"),
        ("vsphere_user", "admin"),
        ("vsphere_password", "secret"),
        ("vsphere_insecure", "false"),
    ]);

    let config = validate(&raw, &builtin::windows_vm()).unwrap();
    assert_eq!(config.get_str("vsphere_host"), Some("vcenter.lab"));
    assert_eq!(config.get_bool("vsphere_insecure"), Some(false));
}

#[test]
fn test_windows_aws_requires_credentials() {
    let mut raw = minimal_windows();
    raw.extend([
        ("hypervisor", "aws"),
        ("aws_access_key", "AKIA"),
        ("aws_secret_key", "s3cr3t"),
        ("aws_security_group", "sg-1"),
        ("aws_keypair", "kp"),
    ]);

    let err = validate(&raw, &builtin::windows_vm()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRequiredField { key } if key == "aws_ami_id"));
}

#[test]
fn test_windows_iso_sources_exclusive() {
    let mut raw = minimal_windows();
    raw.extend([("iso_path", "/isos"), ("iso_url", "https://example.com/w.iso")]);

    let err = validate(&raw, &builtin::windows_vm()).unwrap_err();
    assert!(matches!(err, ConfigError::ConflictingFields { group, .. } if group == "iso_source"));
}

#[test]
fn test_schema_by_name() {
    assert!(builtin::schema_by_name(builtin::WINDOWS_VM).is_some());
    assert!(builtin::schema_by_name("linux").is_none());
}

#[test]
fn test_analyst_template_for_each_hypervisor() {
    for hypervisor in builtin::HYPERVISORS {
        assert!(builtin::analyst_template_for(hypervisor).is_some());
    }
    assert_eq!(builtin::analyst_template_for("qemu"), None);
}
