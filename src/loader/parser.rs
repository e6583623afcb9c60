//! YAML parser for service definitions
//!
//! Parses and validates service YAML files.
//! Supports both built-in services (by name) and custom YAML files (by path).

use crate::error::{Error, Result};
use crate::loader::types::{OperationDefinition, ServiceDefinition};
use crate::services;
use crate::template;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a service definition from a name or file path
///
/// A bare name (no path separators, no `.yaml`/`.yml` extension) is first
/// looked up among the built-in services.
///
/// ```ignore
/// let service = load_service("contact-center")?;
/// let service = load_service("./my-service.yaml")?;
/// ```
pub fn load_service(path: impl AsRef<Path>) -> Result<ServiceDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = services::get_builtin(&path_str) {
            return load_service_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config(format!(
                "Service '{}' not found. Built-in services: {}. Or provide a path to a YAML file.",
                path.display(),
                services::list_builtin().join(", ")
            ))
        } else {
            Error::config(format!(
                "Failed to read service file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_service_from_str(&content)
}

/// Load a service definition from a YAML string
pub fn load_service_from_str(yaml: &str) -> Result<ServiceDefinition> {
    let def: ServiceDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse service YAML: {e}")))?;

    validate_service(&def)?;
    Ok(def)
}

/// Validate a service definition
fn validate_service(def: &ServiceDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Service name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::config("Service base_url cannot be empty"));
    }
    url::Url::parse(&def.base_url).map_err(|e| {
        Error::config(format!("Service base_url '{}' is invalid: {e}", def.base_url))
    })?;

    if def.operations.is_empty() {
        return Err(Error::config("Service must have at least one operation"));
    }

    let names: HashSet<_> = def.operations.iter().map(|op| &op.name).collect();
    if names.len() != def.operations.len() {
        return Err(Error::config("Duplicate operation names found"));
    }

    for op in &def.operations {
        validate_operation(op)?;
    }

    Ok(())
}

/// Validate an operation definition
fn validate_operation(op: &OperationDefinition) -> Result<()> {
    if op.name.is_empty() {
        return Err(Error::config("Operation name cannot be empty"));
    }

    if op.path.is_empty() {
        return Err(Error::config(format!(
            "Operation '{}' path cannot be empty",
            op.name
        )));
    }

    for var in template::extract_variables(&op.path) {
        if !var.starts_with("params.") {
            return Err(Error::config(format!(
                "Operation '{}' path references '{var}'; only params.* may be used",
                op.name
            )));
        }
    }

    if let Some(token) = &op.token {
        if token.request_field.is_empty() || token.response_path.is_empty() {
            return Err(Error::config(format!(
                "Operation '{}' token fields cannot be empty",
                op.name
            )));
        }
    }

    if let Some(page_size) = &op.page_size {
        if op.token.is_none() {
            return Err(Error::config(format!(
                "Operation '{}' declares a page size but no continuation token",
                op.name
            )));
        }
        if page_size.request_field.is_empty() {
            return Err(Error::config(format!(
                "Operation '{}' page size field cannot be empty",
                op.name
            )));
        }
        if page_size.max == 0 {
            return Err(Error::config(format!(
                "Operation '{}' page size max must be at least 1",
                op.name
            )));
        }
    }

    Ok(())
}
