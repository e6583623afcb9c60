//! CLI commands and argument parsing

use crate::error::{Error, Result};
use crate::output::OutputFormat;
use crate::types::JsonValue;
use clap::{Args, Parser, Subcommand};

/// Auto-paginating client for token-based list and search APIs
#[derive(Parser, Debug)]
#[command(name = "autopage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service definition: built-in name or YAML file path
    #[arg(short, long, global = true)]
    pub service: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call an operation, following continuation tokens
    Invoke(InvokeArgs),

    /// List the operations of the service
    Operations,

    /// Validate the service definition
    Validate,

    /// List built-in service definitions
    Services,
}

/// Arguments of one `invoke` command
#[derive(Args, Debug, Clone)]
pub struct InvokeArgs {
    /// Operation name
    pub operation: String,

    /// Bound parameter as KEY=VALUE (VALUE is parsed as JSON when valid)
    #[arg(short, long = "param", value_parser = parse_param)]
    pub params: Vec<(String, JsonValue)>,

    /// Parameters as a JSON object; --param entries override its keys
    #[arg(long)]
    pub params_json: Option<String>,

    /// Resume from this token (fetches a single page, even when empty)
    #[arg(long)]
    pub next_token: Option<String>,

    /// Fetch a single page and print the token for the next one
    #[arg(long)]
    pub no_auto_iteration: bool,

    /// Stop once this many items were received
    #[arg(long)]
    pub max_items: Option<u64>,

    /// Selection: `*`, a dotted field path, or `^Param`
    #[arg(long, default_value = "*")]
    pub select: String,

    /// Write array selections one element per line
    #[arg(long)]
    pub unroll: bool,
}

impl Default for InvokeArgs {
    fn default() -> Self {
        Self {
            operation: String::new(),
            params: Vec::new(),
            params_json: None,
            next_token: None,
            no_auto_iteration: false,
            max_items: None,
            select: "*".to_string(),
            unroll: false,
        }
    }
}

/// Parse a `KEY=VALUE` parameter binding
///
/// The value is taken as JSON when it parses, otherwise as a plain string.
pub fn parse_param(raw: &str) -> Result<(String, JsonValue)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::config(format!("Expected KEY=VALUE, got '{raw}'")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::config(format!("Empty parameter name in '{raw}'")));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| JsonValue::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("InstanceId=i-1", "InstanceId", json!("i-1") ; "plain string")]
    #[test_case("MaxResults=25", "MaxResults", json!(25) ; "number")]
    #[test_case("Active=true", "Active", json!(true) ; "boolean")]
    #[test_case("Filter={\"a\":1}", "Filter", json!({"a": 1}) ; "object")]
    #[test_case("Query=a=b", "Query", json!("a=b") ; "value containing equals")]
    #[test_case("Empty=", "Empty", json!("") ; "empty value")]
    fn test_parse_param(raw: &str, key: &str, value: JsonValue) {
        assert_eq!(parse_param(raw).unwrap(), (key.to_string(), value));
    }

    #[test_case("NoEquals" ; "missing separator")]
    #[test_case("=value" ; "missing key")]
    fn test_parse_param_invalid(raw: &str) {
        assert!(parse_param(raw).is_err());
    }

    #[test]
    fn test_cli_parses_invoke() {
        let cli = Cli::try_parse_from([
            "autopage",
            "--service",
            "contact-center",
            "invoke",
            "SearchQueues",
            "-p",
            "InstanceId=i-1",
            "--max-items",
            "10",
            "--select",
            "Queues",
            "--unroll",
        ])
        .unwrap();

        assert_eq!(cli.service.as_deref(), Some("contact-center"));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Invoke(args) => {
                assert_eq!(args.operation, "SearchQueues");
                assert_eq!(args.params, vec![("InstanceId".to_string(), json!("i-1"))]);
                assert_eq!(args.max_items, Some(10));
                assert_eq!(args.select, "Queues");
                assert!(args.unroll);
                assert!(!args.no_auto_iteration);
                assert!(args.next_token.is_none());
            }
            other => panic!("Expected Invoke, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_keeps_empty_next_token_binding() {
        let cli = Cli::try_parse_from([
            "autopage",
            "invoke",
            "SearchQueues",
            "--next-token",
            "",
        ])
        .unwrap();

        match cli.command {
            Commands::Invoke(args) => {
                assert_eq!(args.next_token.as_deref(), Some(""));
                assert_eq!(args.select, "*");
            }
            other => panic!("Expected Invoke, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["autopage", "operations", "--format", "pretty", "-v"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Operations));
    }

    #[test]
    fn test_cli_rejects_bad_param() {
        let result = Cli::try_parse_from(["autopage", "invoke", "ListQueues", "-p", "oops"]);
        assert!(result.is_err());
    }
}
