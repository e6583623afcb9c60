//! Built-in service definitions embedded in the binary
//!
//! Lets users pass `--service contact-center` instead of a file path.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in service YAML definitions
pub static BUILTIN_SERVICES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();
        m.insert(
            "contact-center",
            include_str!("../services/contact-center.yaml"),
        );
        m.insert("connect", include_str!("../services/contact-center.yaml"));
        m
    });

/// Get a built-in service by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_SERVICES.get(name).copied()
}

/// Check if a name refers to a built-in service
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_SERVICES.contains_key(name)
}

/// List built-in service names (primary names only)
pub fn list_builtin() -> Vec<&'static str> {
    vec!["contact-center"]
}

/// Summary of a built-in service
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    /// Service name
    pub name: &'static str,
    /// Alternative names
    pub aliases: &'static [&'static str],
    /// What the service is
    pub description: &'static str,
}

/// List built-in services with descriptions
pub fn list_builtin_info() -> Vec<ServiceInfo> {
    vec![ServiceInfo {
        name: "contact-center",
        aliases: &["connect"],
        description: "Cloud contact-center queues, contacts, metrics and evaluation forms",
    }]
}
