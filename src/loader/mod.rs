//! YAML service loader
//!
//! Loads service definitions describing each operation's path, method and
//! pagination fields.

mod parser;
mod types;

pub use parser::{load_service, load_service_from_str};
pub use types::{OperationDefinition, PageSizeDefinition, ServiceDefinition, TokenDefinition};

#[cfg(test)]
mod tests;
