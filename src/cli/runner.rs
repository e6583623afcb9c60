//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, InvokeArgs};
use crate::error::{Error, Result};
use crate::loader::{load_service, ServiceDefinition};
use crate::operation::HttpOperation;
use crate::output::{JsonLinesSink, OutputFormat, ResultSink};
use crate::pagination::{FinalSelection, PaginatedInvoker, PagingOptions};
use crate::select::SelectExpr;
use crate::services::list_builtin_info;
use crate::types::{JsonObject, JsonValue, PageToken};
use serde_json::json;
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Invoke(args) => self.invoke(args).await,
            Commands::Operations => self.operations(),
            Commands::Validate => self.validate(),
            Commands::Services => self.list_services(),
        }
    }

    /// Load service definition
    fn load_service(&self) -> Result<ServiceDefinition> {
        let service = self
            .cli
            .service
            .as_ref()
            .ok_or_else(|| Error::config("Service not specified (use -s flag)"))?;
        load_service(service)
    }

    /// Call an operation until paging stops, writing results to stdout
    async fn invoke(&self, args: &InvokeArgs) -> Result<()> {
        let service = self.load_service()?;
        let cancel = CancellationToken::new();
        let signal = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

        let result = invoke_operation(&service, args, self.cli.format, io::stdout(), cancel).await;
        signal.abort();

        if let Some(token) = result? {
            eprintln!("NextToken: {token}");
        }
        Ok(())
    }

    /// List operations of the service
    fn operations(&self) -> Result<()> {
        let service = self.load_service()?;

        for op in &service.operations {
            self.output_message(&json!({
                "name": op.name,
                "method": op.method.to_string(),
                "path": op.path,
                "paginated": op.is_paginated(),
                "max_page_size": op.page_size.as_ref().map(|p| p.max),
                "required_params": op.required_params,
                "description": op.description
            }));
        }

        Ok(())
    }

    /// Validate service definition
    fn validate(&self) -> Result<()> {
        let service = self.load_service()?;
        let paginated = service
            .operations
            .iter()
            .filter(|op| op.is_paginated())
            .count();

        info!(service = %service.name, "Service definition is valid");
        self.output_message(&json!({
            "service": service.name,
            "version": service.version,
            "valid": true,
            "operations": service.operations.len(),
            "paginated_operations": paginated
        }));

        Ok(())
    }

    /// List built-in services
    fn list_services(&self) -> Result<()> {
        for info in list_builtin_info() {
            self.output_message(&json!({
                "name": info.name,
                "aliases": info.aliases,
                "description": info.description
            }));
        }
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Run one `invoke` against a loaded service, writing selections to `out`
///
/// Returns the token left over when paging stopped before the result set was
/// exhausted.
pub async fn invoke_operation<W: io::Write>(
    service: &ServiceDefinition,
    args: &InvokeArgs,
    format: OutputFormat,
    out: W,
    cancel: CancellationToken,
) -> Result<Option<PageToken>> {
    let operation = HttpOperation::from_service(service, &args.operation)?;
    let params = collect_params(args.params_json.as_deref(), &args.params)?;
    let request = operation.request(params.clone())?;

    let select = SelectExpr::parse(&args.select)?;
    let token_bound = args.next_token.is_some();
    let bound_token = args.next_token.as_deref().and_then(PageToken::new);
    let options = PagingOptions::from_bindings(args.no_auto_iteration, token_bound, bound_token)
        .with_item_limit(args.max_items);

    debug!(
        operation = %args.operation,
        select = %select,
        manual = options.manual_paging_requested,
        limit = ?options.item_limit,
        "Invoking operation"
    );

    let invoker = PaginatedInvoker::new(operation)
        .with_options(options)
        .with_selection(select.selection_mode())
        .with_params(params)
        .with_cancellation(cancel);

    let mut sink = JsonLinesSink::new(out)
        .with_format(format)
        .with_unroll(args.unroll);
    let outcome = invoker.invoke(request, &mut sink, &select).await?;

    if let FinalSelection::Selected(value) = outcome.selection {
        sink.emit(value)?;
    }

    Ok(outcome.next_token)
}

/// Merge `--params-json` with `--param` bindings; later bindings win
pub fn collect_params(
    params_json: Option<&str>,
    bindings: &[(String, JsonValue)],
) -> Result<JsonObject> {
    let mut params = match params_json {
        Some(raw) => match serde_json::from_str::<JsonValue>(raw)
            .map_err(|e| Error::config(format!("Invalid params JSON: {e}")))?
        {
            JsonValue::Object(map) => map,
            other => {
                return Err(Error::config(format!(
                    "Params JSON must be an object, got {other}"
                )))
            }
        },
        None => JsonObject::new(),
    };

    for (key, value) in bindings {
        params.insert(key.clone(), value.clone());
    }
    Ok(params)
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Interrupted, cancelling");
        token.cancel();
    }
}
