//! JSON request and page types
//!
//! Generic envelopes for services described by a service definition rather
//! than by hand-written request/response structs.

use crate::pagination::{PageRequest, PageResponse};
use crate::types::{json_path, JsonObject, JsonValue, PageToken};
use serde::{Serialize, Serializer};

// ============================================================================
// JSON Request
// ============================================================================

/// Request made of named parameters
///
/// The token and page-size fields are ordinary parameters whose names come
/// from the operation definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRequest {
    params: JsonObject,
    token_field: Option<String>,
    page_size_field: Option<String>,
}

impl JsonRequest {
    /// Create a request with no parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the parameter that carries the continuation token
    #[must_use]
    pub fn with_token_field(mut self, field: impl Into<String>) -> Self {
        self.token_field = Some(field.into());
        self
    }

    /// Name the parameter that carries the page size
    #[must_use]
    pub fn with_page_size_field(mut self, field: impl Into<String>) -> Self {
        self.page_size_field = Some(field.into());
        self
    }

    /// Replace all parameters
    #[must_use]
    pub fn with_params(mut self, params: JsonObject) -> Self {
        self.params = params;
        self
    }

    /// Set a single parameter
    pub fn set_param(&mut self, name: impl Into<String>, value: JsonValue) {
        self.params.insert(name.into(), value);
    }

    /// Get a parameter
    pub fn param(&self, name: &str) -> Option<&JsonValue> {
        self.params.get(name)
    }

    /// All parameters, token and page size included
    pub fn params(&self) -> &JsonObject {
        &self.params
    }
}

impl PageRequest for JsonRequest {
    fn set_next_token(&mut self, token: Option<&PageToken>) {
        let Some(field) = &self.token_field else {
            return;
        };
        match token {
            Some(token) => {
                self.params
                    .insert(field.clone(), JsonValue::String(token.as_str().to_string()));
            }
            None => {
                self.params.remove(field);
            }
        }
    }

    fn next_token(&self) -> Option<PageToken> {
        let field = self.token_field.as_ref()?;
        self.params
            .get(field)
            .and_then(JsonValue::as_str)
            .and_then(PageToken::new)
    }

    fn set_page_size(&mut self, size: u32) {
        if let Some(field) = &self.page_size_field {
            self.params.insert(field.clone(), JsonValue::from(size));
        }
    }
}

// ============================================================================
// JSON Page
// ============================================================================

/// Response body plus the paths that locate its token and items
///
/// Serializes as the bare body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPage {
    body: JsonValue,
    token_path: Option<String>,
    items_path: Option<String>,
}

impl JsonPage {
    /// Wrap a response body
    pub fn new(body: JsonValue) -> Self {
        Self {
            body,
            token_path: None,
            items_path: None,
        }
    }

    /// Path of the continuation token in the body
    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Path of the item array in the body
    #[must_use]
    pub fn with_items_path(mut self, path: impl Into<String>) -> Self {
        self.items_path = Some(path.into());
        self
    }

    /// The raw response body
    pub fn body(&self) -> &JsonValue {
        &self.body
    }

    /// Consume the page, returning the body
    pub fn into_body(self) -> JsonValue {
        self.body
    }

    /// Items of this page
    ///
    /// Without an items path, a top-level array is the item list and any
    /// other body counts as one item.
    pub fn items(&self) -> &[JsonValue] {
        match &self.items_path {
            Some(path) => match json_path(&self.body, path) {
                Some(JsonValue::Array(items)) => items,
                _ => &[],
            },
            None => match &self.body {
                JsonValue::Array(items) => items,
                other => std::slice::from_ref(other),
            },
        }
    }
}

impl PageResponse for JsonPage {
    fn next_token(&self) -> Option<PageToken> {
        let path = self.token_path.as_ref()?;
        json_path(&self.body, path)
            .and_then(JsonValue::as_str)
            .and_then(PageToken::new)
    }

    fn item_count(&self) -> usize {
        self.items().len()
    }
}

impl Serialize for JsonPage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}
