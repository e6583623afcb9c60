//! Errors raised while invoking paginated operations
//!
//! Every public API returns [`Result`]. [`Error::kind`] groups the variants
//! into the classes the invoker cares about: transport failures may be
//! suppressed once partial results exist, everything else propagates.

use thiserror::Error;

/// Error raised by autopage
#[derive(Error, Debug)]
pub enum Error {
    // ------------------------------------------------------------------
    // Bad inputs, detected before any remote call
    // ------------------------------------------------------------------
    #[error("Invalid service definition: {message}")]
    Config { message: String },

    #[error("Required parameter '{name}' is not bound")]
    MissingParameter { name: String },

    #[error("Invalid invocation configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Malformed YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Malformed JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ------------------------------------------------------------------
    // Remote operation failures
    // ------------------------------------------------------------------
    #[error("Operation '{operation}' failed: {message}")]
    Transport { operation: String, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service answered {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("No response within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Bad URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Undecodable response: {message}")]
    Decode { message: String },

    // ------------------------------------------------------------------
    // Invocation control
    // ------------------------------------------------------------------
    #[error("Invocation cancelled")]
    Cancelled,

    #[error("Result sink failed: {message}")]
    Sink { message: String },

    // ------------------------------------------------------------------
    // Local data handling
    // ------------------------------------------------------------------
    #[error("Bad select expression '{expression}': {message}")]
    Select { expression: String, message: String },

    #[error("Path placeholder has no value: {variable}")]
    UndefinedVariable { variable: String },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Coarse class of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Contradictory or missing inputs
    InvalidConfiguration,
    /// The remote operation failed
    Transport,
    /// The caller cancelled the invocation
    Cancelled,
    /// The result sink refused output
    Sink,
    /// Select expressions, templates, parsing
    Data,
    Other,
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Config { message }
    }

    pub fn missing_param(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::MissingParameter { name }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::InvalidConfiguration { message }
    }

    /// Failure of the named operation that has no more specific variant
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        let (operation, message) = (operation.into(), message.into());
        Self::Transport { operation, message }
    }

    /// Non-success status with the response body
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::HttpStatus { status, body }
    }

    pub fn sink(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Sink { message }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Decode { message }
    }

    pub fn select(expression: impl Into<String>, message: impl Into<String>) -> Self {
        let (expression, message) = (expression.into(), message.into());
        Self::Select {
            expression,
            message,
        }
    }

    pub fn undefined_var(variable: impl Into<String>) -> Self {
        let variable = variable.into();
        Self::UndefinedVariable { variable }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } | Self::MissingParameter { .. } | Self::InvalidConfiguration { .. } => {
                ErrorKind::InvalidConfiguration
            }
            Self::Transport { .. }
            | Self::Http(_)
            | Self::HttpStatus { .. }
            | Self::Timeout { .. }
            | Self::InvalidUrl(_)
            | Self::Decode { .. } => ErrorKind::Transport,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Sink { .. } => ErrorKind::Sink,
            Self::YamlParse(_)
            | Self::JsonParse(_)
            | Self::Select { .. }
            | Self::UndefinedVariable { .. } => ErrorKind::Data,
            Self::Io(_) | Self::Other(_) | Self::Anyhow(_) => ErrorKind::Other,
        }
    }

    /// True when the remote operation itself failed
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Prefix an error with what was being attempted
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> Result<T>;

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        let message = message.into();
        self.with_context(|| message)
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Other(format!("{}: {}", f(), e.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::config("no operations").to_string(),
            "Invalid service definition: no operations"
        );
        assert_eq!(
            Error::missing_param("InstanceId").to_string(),
            "Required parameter 'InstanceId' is not bound"
        );
        assert_eq!(
            Error::http_status(429, "Rate exceeded").to_string(),
            "Service answered 429: Rate exceeded"
        );
        assert_eq!(
            Error::transport("ListQueues", "connection reset").to_string(),
            "Operation 'ListQueues' failed: connection reset"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            Error::invalid_configuration("limit").kind(),
            ErrorKind::InvalidConfiguration
        );
        assert_eq!(Error::missing_param("x").kind(), ErrorKind::InvalidConfiguration);
        assert_eq!(Error::transport("op", "boom").kind(), ErrorKind::Transport);
        assert_eq!(Error::http_status(503, "").kind(), ErrorKind::Transport);
        assert_eq!(Error::Timeout { timeout_ms: 10 }.kind(), ErrorKind::Transport);
        assert_eq!(Error::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(Error::sink("closed").kind(), ErrorKind::Sink);
        assert_eq!(Error::select("^", "empty").kind(), ErrorKind::Data);
        assert_eq!(Error::undefined_var("params.A").kind(), ErrorKind::Data);
        assert_eq!(Error::Other("x".into()).kind(), ErrorKind::Other);
    }

    #[test]
    fn test_is_transport_and_cancelled() {
        assert!(Error::decode("bad body").is_transport());
        assert!(!Error::Cancelled.is_transport());
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::sink("x").is_cancelled());
    }

    #[test]
    fn test_anyhow_errors_convert() {
        let err: Error = anyhow::anyhow!("custom operation failed").into();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.to_string(), "custom operation failed");
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let message = result.context("loading service").unwrap_err().to_string();
        assert_eq!(message, "loading service: Invalid service definition: inner");
    }
}
