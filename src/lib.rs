//! Configuration validation and template rendering for malware analysis VMs.
//!
//! A user configuration document is loaded into a [`config::RawConfig`],
//! checked against a [`config::ConfigSchema`] by [`config::validate`], and
//! the resulting [`config::NormalizedConfig`] fills the `{{ key }}`
//! placeholders of a provisioning [`template::Template`].
//! [`profile`] turns guest customization documents into PowerShell.

pub mod config;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod logging;
pub mod profile;
pub mod template;
