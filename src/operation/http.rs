//! Operations described by a service definition, sent over HTTP

use super::json::{JsonPage, JsonRequest};
use super::types::Operation;
use crate::error::{Error, Result, ResultExt};
use crate::http::{Call, HttpClient, HttpClientConfig};
use crate::loader::{OperationDefinition, ServiceDefinition};
use crate::template;
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// One operation of a service definition
///
/// Parameters referenced by the path template are substituted into the URL
/// and not sent again. The rest travel as query parameters for GET and
/// DELETE, and as a JSON body otherwise.
#[derive(Debug, Clone)]
pub struct HttpOperation {
    client: Arc<HttpClient>,
    definition: OperationDefinition,
}

impl HttpOperation {
    /// Bind an operation definition to a client
    pub fn new(client: Arc<HttpClient>, definition: OperationDefinition) -> Self {
        Self { client, definition }
    }

    /// Build a client for the service and bind the named operation
    pub fn from_service(service: &ServiceDefinition, name: &str) -> Result<Self> {
        let definition = service.operation(name).cloned().ok_or_else(|| {
            Error::config(format!(
                "Operation '{name}' not found in service '{}'. Available: {}",
                service.name,
                service.operation_names().join(", ")
            ))
        })?;

        let config = HttpClientConfig::for_service(service)?;
        let client = HttpClient::with_config(config)
            .with_context(|| format!("Failed to build client for service '{}'", service.name))?;

        Ok(Self::new(Arc::new(client), definition))
    }

    /// The operation definition
    pub fn definition(&self) -> &OperationDefinition {
        &self.definition
    }

    /// Build a request from bound parameters
    ///
    /// Fails when a required parameter is missing or null.
    pub fn request(&self, params: JsonObject) -> Result<JsonRequest> {
        for name in &self.definition.required_params {
            if params.get(name).map_or(true, JsonValue::is_null) {
                return Err(Error::missing_param(name));
            }
        }

        let mut request = JsonRequest::new().with_params(params);
        if let Some(token) = &self.definition.token {
            request = request.with_token_field(&token.request_field);
        }
        if let Some(page_size) = &self.definition.page_size {
            request = request.with_page_size_field(&page_size.request_field);
        }
        Ok(request)
    }

    /// Build the HTTP call for a rendered path and the request parameters
    fn build_call(&self, path: String, params: &JsonObject) -> Call {
        let path_params = template::path_params(&self.definition.path);
        let payload = params
            .iter()
            .filter(|(name, _)| !path_params.contains(*name));

        let call = Call::new(self.definition.method.into(), path);
        if self.definition.method.uses_query() {
            payload
                .filter(|(_, value)| !value.is_null())
                .fold(call, |call, (name, value)| call.query(name, query_value(value)))
        } else {
            let body: JsonObject = payload
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            call.json(JsonValue::Object(body))
        }
    }
}

#[async_trait]
impl Operation for HttpOperation {
    type Request = JsonRequest;
    type Response = JsonPage;

    fn name(&self) -> &str {
        &self.definition.name
    }

    fn max_page_size(&self) -> Option<u32> {
        self.definition.page_size.as_ref().map(|p| p.max)
    }

    async fn call(&self, request: &JsonRequest) -> Result<JsonPage> {
        let path = template::render_with(
            &self.definition.path,
            request.params(),
            template::encode_path_segment,
        )?;

        debug!(
            operation = %self.definition.name,
            method = %self.definition.method,
            path = %path,
            "Calling operation"
        );

        let call = self.build_call(path, request.params());
        let body = self.client.send_json(call).await?;

        let mut page = JsonPage::new(body);
        if let Some(token) = &self.definition.token {
            page = page.with_token_path(&token.response_path);
        }
        if let Some(items_path) = &self.definition.items_path {
            page = page.with_items_path(items_path);
        }
        Ok(page)
    }
}

/// Render a parameter value for a query string
fn query_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
