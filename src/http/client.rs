//! HTTP transport for service operations
//!
//! A thin layer over `reqwest`:
//! - base URL and default headers validated once, when the client is built
//! - one [`Call`] value describing each request
//! - non-success statuses and timeouts mapped to [`Error`]
//!
//! Each call is sent exactly once.

use crate::error::{Error, Result};
use crate::loader::ServiceDefinition;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client settings shared by every call
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL that relative call paths are appended to
    pub base_url: Option<Url>,
    /// Timeout for calls that do not set their own
    pub timeout: Duration,
    /// Headers sent with every call
    pub default_headers: HeaderMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            default_headers: HeaderMap::new(),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    /// Settings with no base URL and the default timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings taken from a service definition
    pub fn for_service(service: &ServiceDefinition) -> Result<Self> {
        let mut config = Self::new()
            .with_base_url(&service.base_url)?
            .with_timeout(Duration::from_secs(service.timeout_secs));
        for (name, value) in &service.headers {
            config = config.with_header(name, value)?;
        }
        Ok(config)
    }

    /// Resolve relative paths against `base_url`
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Some(Url::parse(base_url)?);
        Ok(self)
    }

    /// Set the default timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send `name: value` with every call
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let (name, value) = parse_header(name, value)?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Set the user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// One request: method, path and payload
#[derive(Debug, Clone)]
pub struct Call {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL, or an absolute URL
    pub path: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Extra headers for this call
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Timeout overriding the client default
    pub timeout: Option<Duration>,
}

impl Call {
    /// A call with no query, headers or body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// A GET call
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Add a header for this call only
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Send `body` as JSON
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the client timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Client with the given settings
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(config.default_headers.clone())
            .build()?;

        Ok(Self { client, config })
    }

    /// Client settings
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send a call, failing on any non-success status
    pub async fn send(&self, call: Call) -> Result<Response> {
        let url = self.resolve(&call.path)?;
        let timeout = call.timeout.unwrap_or(self.config.timeout);

        let mut req = self
            .client
            .request(call.method.clone(), url.clone())
            .timeout(timeout);
        for (name, value) in &call.headers {
            let (name, value) = parse_header(name, value)?;
            req = req.header(name, value);
        }
        if !call.query.is_empty() {
            req = req.query(&call.query);
        }
        if let Some(body) = &call.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        debug!(method = %call.method, url = %url, status = status.as_u16(), "HTTP call");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }
        Ok(response)
    }

    /// Send a call and parse the response body as JSON
    ///
    /// An empty body parses as `null`.
    pub async fn send_json(&self, call: Call) -> Result<Value> {
        let text = self
            .send(call)
            .await?
            .text()
            .await
            .map_err(|e| Error::decode(format!("Failed to read response body: {e}")))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
    }

    /// Absolute URL for a call path
    ///
    /// Relative paths are appended to the base URL's path, so a base of
    /// `https://host/v1` and a path of `/queues` give `https://host/v1/queues`.
    fn resolve(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        let Some(base) = &self.config.base_url else {
            return Ok(Url::parse(path)?);
        };

        let mut url = base.clone();
        let joined = format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let (joined_path, query) = match joined.split_once('?') {
            Some((p, q)) => (p.to_string(), Some(q.to_string())),
            None => (joined, None),
        };
        url.set_path(&joined_path);
        url.set_query(query.as_deref());
        Ok(url)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::config(format!("Invalid header name '{name}': {e}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| Error::config(format!("Invalid value for header '{name}': {e}")))?;
    Ok((header_name, header_value))
}
