//! Implementation of the `malboxes schema` command.

use malboxes::config::{builtin, ConfigSchema};
use malboxes::error::Result;

pub fn cmd_schema() -> Result<()> {
    print!("{}", describe(&builtin::windows_vm()));
    Ok(())
}

/// One line per field: name, type, requirement, then any default, group
/// and gate.
pub(crate) fn describe(schema: &ConfigSchema) -> String {
    let mut out = format!("Schema: {}\n\n", schema.name());
    for field in schema.fields() {
        let mut line = format!(
            "{:<22} {:<28} {}",
            field.name(),
            field.expected(),
            field.requirement()
        );
        if let Some(default) = field.default_value() {
            line.push_str(&format!(", default '{}'", default));
        }
        if let Some(group) = field.exclusive_group() {
            line.push_str(&format!(", exclusive group '{}'", group));
        }
        if let Some(gate) = field.gate() {
            line.push_str(&format!(", only if {}", gate));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
