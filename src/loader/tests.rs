//! Tests for YAML loader module

use super::*;
use crate::types::Method;
use pretty_assertions::assert_eq;
use std::io::Write;

// ============================================================================
// Basic Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_service() {
    let yaml = r"
name: test-service
base_url: https://api.example.com
operations:
  - name: ListItems
    path: /items
";

    let def = load_service_from_str(yaml).unwrap();
    assert_eq!(def.name, "test-service");
    assert_eq!(def.base_url, "https://api.example.com");
    assert_eq!(def.version, "0.1.0");
    assert_eq!(def.timeout_secs, 30);
    assert_eq!(def.operations.len(), 1);

    let op = &def.operations[0];
    assert_eq!(op.name, "ListItems");
    assert_eq!(op.path, "/items");
    assert_eq!(op.method, Method::POST);
    assert!(!op.is_paginated());
    assert!(op.page_size.is_none());
    assert!(op.required_params.is_empty());
}

#[test]
fn test_load_paginated_operation() {
    let yaml = r"
name: test-service
base_url: https://api.example.com
operations:
  - name: SearchQueues
    method: POST
    path: /search-queues
    token:
      request_field: NextToken
      response_path: Page.Next
    items_path: Queues
    page_size:
      request_field: MaxResults
      max: 50
    required_params: [InstanceId]
";

    let def = load_service_from_str(yaml).unwrap();
    let op = def.operation("SearchQueues").unwrap();

    assert_eq!(
        op.token,
        Some(TokenDefinition {
            request_field: "NextToken".to_string(),
            response_path: "Page.Next".to_string(),
        })
    );
    assert_eq!(
        op.page_size,
        Some(PageSizeDefinition {
            request_field: "MaxResults".to_string(),
            max: 50,
        })
    );
    assert_eq!(op.items_path.as_deref(), Some("Queues"));
    assert_eq!(op.required_params, vec!["InstanceId".to_string()]);
}

#[test]
fn test_token_and_page_size_defaults() {
    let yaml = r"
name: test-service
base_url: https://api.example.com
operations:
  - name: ListItems
    method: GET
    path: /items
    token: {}
    page_size: {}
";

    let def = load_service_from_str(yaml).unwrap();
    let op = &def.operations[0];
    assert_eq!(op.token, Some(TokenDefinition::default()));
    assert_eq!(op.token.as_ref().unwrap().request_field, "NextToken");
    assert_eq!(op.page_size.as_ref().unwrap().request_field, "MaxResults");
    assert_eq!(op.page_size.as_ref().unwrap().max, 100);
}

#[test]
fn test_headers_and_timeout() {
    let yaml = r"
name: test-service
base_url: https://api.example.com
timeout_secs: 5
headers:
  Accept: application/json
operations:
  - name: ListItems
    path: /items
";

    let def = load_service_from_str(yaml).unwrap();
    assert_eq!(def.timeout_secs, 5);
    assert_eq!(
        def.headers.get("Accept"),
        Some(&"application/json".to_string())
    );
}

#[test]
fn test_operation_lookup_is_case_insensitive_fallback() {
    let yaml = r"
name: test-service
base_url: https://api.example.com
operations:
  - name: ListItems
    path: /items
  - name: SearchItems
    path: /search
";

    let def = load_service_from_str(yaml).unwrap();
    assert_eq!(def.operation("listitems").unwrap().name, "ListItems");
    assert_eq!(def.operation("SearchItems").unwrap().path, "/search");
    assert!(def.operation("DeleteItems").is_none());
    assert_eq!(def.operation_names(), vec!["ListItems", "SearchItems"]);
}

// ============================================================================
// Validation Tests
// ============================================================================

fn assert_config_error(yaml: &str, needle: &str) {
    let err = load_service_from_str(yaml).unwrap_err();
    assert!(
        err.to_string().contains(needle),
        "expected '{needle}' in '{err}'"
    );
}

#[test]
fn test_rejects_missing_operations() {
    assert_config_error(
        r"
name: test-service
base_url: https://api.example.com
operations: []
",
        "at least one operation",
    );
}

#[test]
fn test_rejects_empty_name() {
    assert_config_error(
        r#"
name: ""
base_url: https://api.example.com
operations:
  - name: ListItems
    path: /items
"#,
        "Service name cannot be empty",
    );
}

#[test]
fn test_rejects_invalid_base_url() {
    assert_config_error(
        r"
name: test-service
base_url: not a url
operations:
  - name: ListItems
    path: /items
",
        "base_url",
    );
}

#[test]
fn test_rejects_duplicate_operations() {
    assert_config_error(
        r"
name: test-service
base_url: https://api.example.com
operations:
  - name: ListItems
    path: /items
  - name: ListItems
    path: /other
",
        "Duplicate operation names",
    );
}

#[test]
fn test_rejects_zero_page_size() {
    assert_config_error(
        r"
name: test-service
base_url: https://api.example.com
operations:
  - name: ListItems
    path: /items
    token: {}
    page_size:
      max: 0
",
        "page size max must be at least 1",
    );
}

#[test]
fn test_rejects_page_size_without_token() {
    assert_config_error(
        r"
name: test-service
base_url: https://api.example.com
operations:
  - name: ListItems
    path: /items
    page_size:
      max: 10
",
        "no continuation token",
    );
}

#[test]
fn test_rejects_non_param_path_template() {
    assert_config_error(
        r"
name: test-service
base_url: https://api.example.com
operations:
  - name: ListItems
    path: /items/{{ config.id }}
",
        "only params.* may be used",
    );
}

#[test]
fn test_rejects_invalid_method() {
    let yaml = r"
name: test-service
base_url: https://api.example.com
operations:
  - name: ListItems
    method: FETCH
    path: /items
";
    assert!(load_service_from_str(yaml).is_err());
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_service_from_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        r"
name: file-service
base_url: https://api.example.com
operations:
  - name: ListItems
    path: /items
"
    )
    .unwrap();

    let def = load_service(file.path()).unwrap();
    assert_eq!(def.name, "file-service");
}

#[test]
fn test_load_builtin_by_name() {
    let def = load_service("contact-center").unwrap();
    assert_eq!(def.name, "contact-center");
    assert!(def.operation("SearchQueues").is_some());
}

#[test]
fn test_load_missing_file_lists_builtins() {
    let err = load_service("./does-not-exist.yaml").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("not found"));
    assert!(message.contains("contact-center"));
}
