//! CLI module
//!
//! Command-line interface for invoking service operations.
//!
//! # Commands
//!
//! - `invoke` - Call an operation, following continuation tokens
//! - `operations` - List the operations of a service
//! - `validate` - Validate a service definition
//! - `services` - List built-in service definitions

mod commands;
mod runner;

pub use commands::{parse_param, Cli, Commands, InvokeArgs};
pub use runner::{collect_params, invoke_operation, Runner};
