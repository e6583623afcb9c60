//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML service → paginated HTTP calls →
//! selection → JSON lines output

use autopage::cli::{invoke_operation, InvokeArgs};
use autopage::loader::{load_service_from_str, ServiceDefinition};
use autopage::output::{CollectSink, OutputFormat};
use autopage::pagination::{PaginatedInvoker, PagingOptions};
use autopage::select::SelectExpr;
use autopage::{Error, ErrorKind, HttpOperation, PageToken};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> ServiceDefinition {
    let yaml = format!(
        r#"
name: mock-contact-center
base_url: {}
headers:
  Accept: application/json
operations:
  - name: SearchQueues
    method: POST
    path: /search-queues
    token:
      request_field: NextToken
      response_path: NextToken
    items_path: Queues
    page_size:
      request_field: MaxResults
      max: 100
    required_params: [InstanceId]
  - name: ListQueues
    method: GET
    path: /queues-summary/{{{{ params.InstanceId }}}}
    token:
      request_field: nextToken
      response_path: NextToken
    items_path: QueueSummaryList
    required_params: [InstanceId]
"#,
        server.uri()
    );
    load_service_from_str(&yaml).unwrap()
}

fn search_args() -> InvokeArgs {
    InvokeArgs {
        operation: "SearchQueues".to_string(),
        params: vec![("InstanceId".to_string(), json!("i-1"))],
        select: "*".to_string(),
        ..Default::default()
    }
}

async fn mount_page(server: &MockServer, request: Value, response: Value) {
    Mock::given(method("POST"))
        .and(path("/search-queues"))
        .and(body_json(request))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(server)
        .await;
}

/// Three pages of two queues each, tokens A then B then none
async fn mount_three_pages(server: &MockServer) {
    mount_page(
        server,
        json!({"InstanceId": "i-1"}),
        json!({"Queues": [{"Id": "q1"}, {"Id": "q2"}], "NextToken": "A"}),
    )
    .await;
    mount_page(
        server,
        json!({"InstanceId": "i-1", "NextToken": "A"}),
        json!({"Queues": [{"Id": "q3"}, {"Id": "q4"}], "NextToken": "B"}),
    )
    .await;
    mount_page(
        server,
        json!({"InstanceId": "i-1", "NextToken": "B"}),
        json!({"Queues": [{"Id": "q5"}, {"Id": "q6"}]}),
    )
    .await;
}

async fn run(
    service: &ServiceDefinition,
    args: &InvokeArgs,
) -> autopage::Result<(Vec<Value>, Option<PageToken>)> {
    let mut out = Vec::new();
    let token = invoke_operation(
        service,
        args,
        OutputFormat::Json,
        &mut out,
        CancellationToken::new(),
    )
    .await?;
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    Ok((lines, token))
}

fn queue_ids(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(|v| v["Id"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Auto-iteration
// ============================================================================

#[tokio::test]
async fn test_invoke_follows_tokens_to_exhaustion() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;
    let service = service_for(&mock_server);

    let (lines, token) = run(&service, &search_args()).await.unwrap();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["NextToken"], "A");
    assert_eq!(lines[2]["Queues"][1]["Id"], "q6");
    assert!(token.is_none());
}

#[tokio::test]
async fn test_invoke_select_field_with_unroll() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.select = "Queues".to_string();
    args.unroll = true;
    let (lines, _) = run(&service, &args).await.unwrap();

    assert_eq!(queue_ids(&lines), vec!["q1", "q2", "q3", "q4", "q5", "q6"]);
}

#[tokio::test]
async fn test_invoke_echo_selection_pages_then_echoes_once() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.select = "^InstanceId".to_string();
    let (lines, token) = run(&service, &args).await.unwrap();

    assert_eq!(lines, vec![json!("i-1")]);
    assert!(token.is_none());
}

// ============================================================================
// Manual paging
// ============================================================================

#[tokio::test]
async fn test_invoke_no_auto_iteration_returns_token() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        json!({"InstanceId": "i-1"}),
        json!({"Queues": [{"Id": "q1"}], "NextToken": "A"}),
    )
    .await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.no_auto_iteration = true;
    let (lines, token) = run(&service, &args).await.unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(token, PageToken::new("A"));
}

#[tokio::test]
async fn test_invoke_bound_token_fetches_one_page() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        json!({"InstanceId": "i-1", "NextToken": "A"}),
        json!({"Queues": [{"Id": "q3"}], "NextToken": "B"}),
    )
    .await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.next_token = Some("A".to_string());
    args.select = "Queues".to_string();
    args.unroll = true;
    let (lines, token) = run(&service, &args).await.unwrap();

    assert_eq!(queue_ids(&lines), vec!["q3"]);
    assert_eq!(token, PageToken::new("B"));
}

#[tokio::test]
async fn test_invoke_empty_bound_token_fetches_first_page_only() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        json!({"InstanceId": "i-1"}),
        json!({"Queues": [{"Id": "q1"}, {"Id": "q2"}], "NextToken": "A"}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/search-queues"))
        .and(body_json(json!({"InstanceId": "i-1", "NextToken": "A"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Queues": []})))
        .expect(0)
        .mount(&mock_server)
        .await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.next_token = Some(String::new());
    args.select = "Queues".to_string();
    args.unroll = true;
    let (lines, token) = run(&service, &args).await.unwrap();

    assert_eq!(queue_ids(&lines), vec!["q1", "q2"]);
    assert_eq!(token, PageToken::new("A"));
}

// ============================================================================
// Item limit
// ============================================================================

#[tokio::test]
async fn test_invoke_max_items_negotiates_page_size() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        json!({"InstanceId": "i-1", "MaxResults": 3}),
        json!({"Queues": [{"Id": "q1"}, {"Id": "q2"}], "NextToken": "A"}),
    )
    .await;
    mount_page(
        &mock_server,
        json!({"InstanceId": "i-1", "NextToken": "A", "MaxResults": 1}),
        json!({"Queues": [{"Id": "q3"}, {"Id": "q4"}], "NextToken": "B"}),
    )
    .await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.max_items = Some(3);
    args.select = "Queues".to_string();
    args.unroll = true;
    let (lines, token) = run(&service, &args).await.unwrap();

    assert_eq!(queue_ids(&lines), vec!["q1", "q2", "q3", "q4"]);
    assert_eq!(token, PageToken::new("B"));
}

#[tokio::test]
async fn test_invoke_bounded_run_keeps_partial_results_on_failure() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        json!({"InstanceId": "i-1", "MaxResults": 10}),
        json!({"Queues": [{"Id": "q1"}, {"Id": "q2"}], "NextToken": "A"}),
    )
    .await;
    mount_page(
        &mock_server,
        json!({"InstanceId": "i-1", "NextToken": "A", "MaxResults": 8}),
        json!({"Queues": [{"Id": "q3"}, {"Id": "q4"}], "NextToken": "B"}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/search-queues"))
        .and(body_json(json!({"InstanceId": "i-1", "NextToken": "B", "MaxResults": 6})))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate exceeded"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.max_items = Some(10);
    args.select = "Queues".to_string();
    args.unroll = true;
    let (lines, token) = run(&service, &args).await.unwrap();

    assert_eq!(queue_ids(&lines), vec!["q1", "q2", "q3", "q4"]);
    assert_eq!(token, PageToken::new("B"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_invoke_first_call_failure_is_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search-queues"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.max_items = Some(10);
    let err = run(&service, &args).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_invoke_unbounded_mid_stream_failure_is_reported() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        json!({"InstanceId": "i-1"}),
        json!({"Queues": [{"Id": "q1"}], "NextToken": "A"}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/search-queues"))
        .and(body_json(json!({"InstanceId": "i-1", "NextToken": "A"})))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let service = service_for(&mock_server);

    let err = run(&service, &search_args()).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_invoke_missing_required_param_makes_no_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    let service = service_for(&mock_server);

    let args = InvokeArgs {
        operation: "SearchQueues".to_string(),
        select: "*".to_string(),
        ..Default::default()
    };
    let err = run(&service, &args).await.unwrap_err();
    assert!(matches!(err, Error::MissingParameter { .. }));
}

#[tokio::test]
async fn test_invoke_zero_max_items_is_invalid() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.max_items = Some(0);
    let err = run(&service, &args).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
}

#[tokio::test]
async fn test_invoke_unbound_echo_is_invalid() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    let mut args = search_args();
    args.select = "^ContactId".to_string();
    let err = run(&service, &args).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
}

// ============================================================================
// GET operations and library use
// ============================================================================

#[tokio::test]
async fn test_get_operation_threads_token_as_query_param() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/queues-summary/i-1"))
        .and(query_param_is_missing("nextToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "QueueSummaryList": [{"Id": "q1"}],
            "NextToken": "next-page"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/queues-summary/i-1"))
        .and(query_param("nextToken", "next-page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "QueueSummaryList": [{"Id": "q2"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    let service = service_for(&mock_server);

    let operation = HttpOperation::from_service(&service, "ListQueues").unwrap();
    let mut params = serde_json::Map::new();
    params.insert("InstanceId".to_string(), json!("i-1"));
    let request = operation.request(params).unwrap();

    let invoker = PaginatedInvoker::new(operation).with_options(PagingOptions::new());
    let select = SelectExpr::parse("QueueSummaryList").unwrap();
    let mut sink = CollectSink::new();
    let outcome = invoker.invoke(request, &mut sink, &select).await.unwrap();

    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.items_emitted, 2);
    assert!(outcome.is_exhausted());
    assert_eq!(
        sink.into_values(),
        vec![json!([{"Id": "q1"}]), json!([{"Id": "q2"}])]
    );
}

#[tokio::test]
async fn test_cancelled_invocation_makes_no_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    let service = service_for(&mock_server);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut out = Vec::new();
    let err = invoke_operation(
        &service,
        &search_args(),
        OutputFormat::Json,
        &mut out,
        cancel,
    )
    .await
    .unwrap_err();

    assert!(err.is_cancelled());
    assert!(out.is_empty());
}
