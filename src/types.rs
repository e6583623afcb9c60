//! Shared types: JSON aliases, continuation tokens and HTTP methods

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

pub type JsonValue = serde_json::Value;

/// Named request parameters
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Page Token
// ============================================================================

/// Opaque continuation token issued by a remote service
///
/// A token is only meaningful to the server that issued it, and only when
/// presented again with the exact request that produced it. It is never parsed
/// or rewritten here. An empty string is not a token: [`PageToken::new`]
/// returns `None` for it, which is how "no further pages" is represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    /// Wrap a server-issued token, treating the empty string as absent
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Token text, exactly as issued
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning its text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method of a service operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    GET,
    #[default]
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    /// Whether parameters travel as query string rather than JSON body
    pub fn uses_query(self) -> bool {
        matches!(self, Self::GET | Self::DELETE)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::PATCH => "PATCH",
            Self::DELETE => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => Self::GET,
            Method::POST => Self::POST,
            Method::PUT => Self::PUT,
            Method::PATCH => Self::PATCH,
            Method::DELETE => Self::DELETE,
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Walk a dotted path (`"Summary.Queues"`) through nested JSON objects
///
/// A leading `$.` is accepted and ignored. Numeric segments index into arrays.
pub fn json_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = match current {
            JsonValue::Object(map) => map.get(part)?,
            JsonValue::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_token_empty_is_none() {
        assert!(PageToken::new("").is_none());
        let token = PageToken::new("abc==").unwrap();
        assert_eq!(token.as_str(), "abc==");
        assert_eq!(token.to_string(), "abc==");
        assert_eq!(token.into_inner(), "abc==".to_string());
    }

    #[test]
    fn test_page_token_is_verbatim() {
        let raw = "  eyJvZmZzZXQiOjEwMH0= ";
        let token = PageToken::new(raw).unwrap();
        assert_eq!(token.as_str(), raw);
    }

    #[test]
    fn test_page_token_serde_transparent() {
        let token: PageToken = serde_json::from_str("\"next-1\"").unwrap();
        assert_eq!(token.as_str(), "next-1");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"next-1\"");
    }

    #[test]
    fn test_method_conversion() {
        let get: reqwest::Method = Method::GET.into();
        assert_eq!(reqwest::Method::GET, get);
        let post: reqwest::Method = Method::POST.into();
        assert_eq!(reqwest::Method::POST, post);
    }

    #[test]
    fn test_method_default_and_query() {
        assert_eq!(Method::default(), Method::POST);
        assert!(Method::GET.uses_query());
        assert!(!Method::POST.uses_query());
        let method: Method = serde_json::from_str("\"GET\"").unwrap();
        assert_eq!(method, Method::GET);
    }

    #[test]
    fn test_json_path() {
        let value = json!({"Summary": {"Queues": [{"Id": "q1"}, {"Id": "q2"}]}, "Next": null});
        assert_eq!(json_path(&value, "Summary.Queues.1.Id"), Some(&json!("q2")));
        assert_eq!(json_path(&value, "$.Summary.Queues.0.Id"), Some(&json!("q1")));
        assert_eq!(json_path(&value, "Next"), Some(&JsonValue::Null));
        assert_eq!(json_path(&value, "Missing.Field"), None);
        assert_eq!(json_path(&value, "$"), Some(&value));
    }
}
