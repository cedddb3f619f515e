//! Component naming

use crate::error::{NamingError, Result};

/// Resource name shared by a component's children: `{prefix}-{project}-{environment}`
pub fn component_name(prefix: &str, project: &str, environment: &str) -> Result<String> {
    for (argument, value) in [
        ("prefix", prefix),
        ("project", project),
        ("environment", environment),
    ] {
        if value.trim().is_empty() {
            return Err(NamingError::invalid(argument, value, "must not be empty"));
        }
    }
    Ok(format!("{prefix}-{project}-{environment}"))
}
