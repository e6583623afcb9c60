//! Loader types
//!
//! Declarative service definition types for YAML parsing.

use crate::pagination::DEFAULT_MAX_PAGE_SIZE;
use crate::types::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Service Definition
// ============================================================================

/// Top-level service definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceDefinition {
    /// Service name
    pub name: String,
    /// Definition version
    #[serde(default = "default_version")]
    pub version: String,
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Operations exposed by the service
    pub operations: Vec<OperationDefinition>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ServiceDefinition {
    /// Find an operation by name, ignoring ASCII case when there is no exact match
    pub fn operation(&self, name: &str) -> Option<&OperationDefinition> {
        self.operations
            .iter()
            .find(|op| op.name == name)
            .or_else(|| {
                self.operations
                    .iter()
                    .find(|op| op.name.eq_ignore_ascii_case(name))
            })
    }

    /// Names of all operations, in definition order
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name.as_str()).collect()
    }
}

// ============================================================================
// Operation Definition
// ============================================================================

/// One remote operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationDefinition {
    /// Operation name (e.g., "SearchQueues")
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// URL path, may contain `{{ params.Name }}` placeholders
    pub path: String,
    /// Continuation token fields; absent for operations that never paginate
    #[serde(default)]
    pub token: Option<TokenDefinition>,
    /// Dotted path to the item array in the response
    #[serde(default)]
    pub items_path: Option<String>,
    /// Page-size negotiation, for operations that accept a page size
    #[serde(default)]
    pub page_size: Option<PageSizeDefinition>,
    /// Parameters that must be bound before calling
    #[serde(default)]
    pub required_params: Vec<String>,
}

impl OperationDefinition {
    /// Whether the operation returns continuation tokens
    pub fn is_paginated(&self) -> bool {
        self.token.is_some()
    }
}

/// Where the continuation token travels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TokenDefinition {
    /// Request parameter the token is written to
    #[serde(default = "default_token_field")]
    pub request_field: String,
    /// Dotted path of the token in the response
    #[serde(default = "default_token_field")]
    pub response_path: String,
}

fn default_token_field() -> String {
    "NextToken".to_string()
}

impl Default for TokenDefinition {
    fn default() -> Self {
        Self {
            request_field: default_token_field(),
            response_path: default_token_field(),
        }
    }
}

/// Page-size request field and its server-side maximum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PageSizeDefinition {
    /// Request parameter the page size is written to
    #[serde(default = "default_page_size_field")]
    pub request_field: String,
    /// Largest page size the server accepts
    #[serde(default = "default_max_page_size")]
    pub max: u32,
}

fn default_page_size_field() -> String {
    "MaxResults".to_string()
}

fn default_max_page_size() -> u32 {
    DEFAULT_MAX_PAGE_SIZE
}

impl Default for PageSizeDefinition {
    fn default() -> Self {
        Self {
            request_field: default_page_size_field(),
            max: default_max_page_size(),
        }
    }
}
