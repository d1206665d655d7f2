use std::sync::{Arc, Mutex};
use std::time::Duration;

use azure_pricing_client::{
    ClientConfig, ErrorKind, Field, FieldValue, PriceQuery, PricingClient, PricingLogger,
    RequestContext, Severity,
};
use reqwest::header::HeaderMap;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone)]
struct Record {
    level: Severity,
    message: String,
    fields: Vec<Field>,
}

impl Record {
    fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }
}

#[derive(Default)]
struct RecordingLogger {
    records: Mutex<Vec<Record>>,
}

impl RecordingLogger {
    fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    fn errors(&self) -> Vec<Record> {
        self.records()
            .into_iter()
            .filter(|r| r.message == "pricing query error")
            .collect()
    }
}

impl PricingLogger for RecordingLogger {
    fn log(&self, level: Severity, message: &str, fields: &[Field]) {
        self.records.lock().unwrap().push(Record {
            level,
            message: message.to_string(),
            fields: fields.to_vec(),
        });
    }
}

fn item(region: &str, sku: &str, price: f64) -> Value {
    json!({
        "currencyCode": "USD",
        "retailPrice": price,
        "unitPrice": price,
        "armRegionName": region,
        "armSkuName": sku,
        "skuName": sku,
        "serviceName": "Virtual Machines",
        "type": "Consumption",
        "unitOfMeasure": "1 Hour"
    })
}

fn page(items: Vec<Value>, next: Option<String>) -> Value {
    json!({
        "BillingCurrency": "USD",
        "CustomerEntityId": "Default",
        "CustomerEntityType": "Retail",
        "Count": items.len(),
        "Items": items,
        "NextPageLink": next
    })
}

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new()
        .with_base_url(format!("{}/prices", server.uri()))
        .with_retry_wait(Duration::from_millis(1), Duration::from_millis(5))
        .with_timeout(Duration::from_secs(10))
}

fn vm_query() -> PriceQuery {
    PriceQuery::new().region("eastus").sku("Standard_B1s")
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test]
async fn test_get_prices_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prices"))
        .and(query_param(
            "$filter",
            "armRegionName eq 'eastus' and armSkuName eq 'Standard_B1s'",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "Standard_B1s", 0.0104)], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    let items = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].retail_price, 0.0104);
    assert_eq!(items[0].arm_sku_name, "Standard_B1s");
}

#[tokio::test]
async fn test_empty_query_sends_no_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("westus", "A1", 1.0)], None)))
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    client.get_prices(&RequestContext::new(), &PriceQuery::new()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_quote_injection_is_escaped_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("$filter", "armRegionName eq 'x'' or ''a'' eq ''a'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("x", "y", 1.0)], None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    let query = PriceQuery::new().region("x' or 'a' eq 'a");
    assert!(client.get_prices(&RequestContext::new(), &query).await.is_ok());
}

#[tokio::test]
async fn test_sends_user_agent_and_accept_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "finops-tests/2.0"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "B1", 1.0)], None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server).with_user_agent("finops-tests/2.0")).unwrap();
    assert!(client.get_prices(&RequestContext::new(), &vm_query()).await.is_ok());
}

#[tokio::test]
async fn test_default_user_agent_identifies_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "B1", 1.0)], None)))
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("azure-pricing-client/"), "{agent}");
}

#[tokio::test]
async fn test_pagination_concatenates_pages_in_order() {
    let server = MockServer::start().await;
    let next = format!("{}/prices/page2", server.uri());
    Mock::given(path("/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![item("eastus", "A", 1.0), item("eastus", "B", 2.0)],
            Some(next),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/prices/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "C", 3.0)], None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    let items = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap();

    let skus: Vec<_> = items.iter().map(|i| i.arm_sku_name.as_str()).collect();
    assert_eq!(skus, vec!["A", "B", "C"]);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_empty_next_link_ends_pagination() {
    let server = MockServer::start().await;
    Mock::given(path("/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "A", 1.0)], Some(String::new()))))
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap();
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_rate_limited_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "A", 1.0)], None)))
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server).with_retry_max(3)).unwrap();
    let items = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_no_retries_classifies_throttling_statuses() {
    for (status, kind) in [(429, ErrorKind::RateLimited), (503, ErrorKind::ServiceUnavailable)] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = PricingClient::new(config(&server).with_retry_max(0)).unwrap();
        let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

        assert!(err.is(kind), "{status}: {err}");
        assert_eq!(request_count(&server).await, 1, "{status}");
    }
}

#[tokio::test]
async fn test_exhausted_retries_classified_by_final_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let client = PricingClient::new(config(&server).with_retry_max(2).with_logger(logger.clone())).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    assert!(err.is(ErrorKind::RateLimited), "{err}");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(429));
    assert!(err.to_string().contains("status 429: Too many requests"), "{err}");
    assert_eq!(request_count(&server).await, 3);

    let retries = logger
        .records()
        .into_iter()
        .filter(|r| r.message == "retrying request")
        .count();
    assert_eq!(retries, 2);

    let errors = logger.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, Severity::Warn);
}

#[tokio::test]
async fn test_bad_request_is_never_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid OData filter"))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let client = PricingClient::new(config(&server).with_retry_max(5).with_logger(logger.clone())).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    assert!(err.is(ErrorKind::RequestFailed));
    assert_eq!(request_count(&server).await, 1);

    let errors = logger.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, Severity::Warn);
    assert_eq!(errors[0].get("error_category"), Some(&FieldValue::Str("request_failed".into())));
}

#[tokio::test]
async fn test_server_error_is_request_failed_at_error_severity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let client = PricingClient::new(config(&server).with_retry_max(3).with_logger(logger.clone())).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    assert!(err.is(ErrorKind::RequestFailed));
    assert_eq!(request_count(&server).await, 1);
    assert_eq!(logger.errors()[0].level, Severity::Error);
}

#[tokio::test]
async fn test_not_found_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such resource"))
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    assert!(err.is(ErrorKind::NotFound));
    assert_eq!(err.page(), Some(0));
    assert_eq!(tonic::Status::from(err).code(), tonic::Code::NotFound);
}

#[tokio::test]
async fn test_empty_result_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![], None)))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let client = PricingClient::new(config(&server).with_logger(logger.clone())).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    assert!(err.is(ErrorKind::NotFound));
    let message = err.to_string();
    assert!(message.contains("no pricing data"), "{message}");
    assert!(message.contains("eastus"), "{message}");
    assert!(message.contains("Standard_B1s"), "{message}");
    assert_eq!(err.page(), None);

    let errors = logger.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, Severity::Debug);
}

#[tokio::test]
async fn test_pagination_limit_exceeded() {
    let server = MockServer::start().await;
    let next = format!("{}/prices", server.uri());
    Mock::given(path("/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "A", 1.0)], Some(next.clone()))))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let client = PricingClient::new(config(&server).with_max_pages(5).with_logger(logger.clone())).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    assert!(err.is(ErrorKind::PaginationLimitExceeded), "{err}");
    assert_eq!(err.page(), None);
    assert_eq!(request_count(&server).await, 5);

    let errors = logger.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, Severity::Error);
    assert_eq!(errors[0].get("url"), Some(&FieldValue::Str(next)));
    assert_eq!(errors[0].get("page"), None);
}

#[tokio::test]
async fn test_invalid_json_includes_snippet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway error</html>"))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let client = PricingClient::new(config(&server).with_logger(logger.clone())).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    assert!(err.is(ErrorKind::InvalidResponse));
    assert!(err.to_string().contains("(response: <html>gateway error</html>)"), "{err}");
    assert_eq!(logger.errors()[0].level, Severity::Error);
}

#[tokio::test]
async fn test_error_snippet_is_truncated() {
    let server = MockServer::start().await;
    let body = "x".repeat(500);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    let message = err.to_string();
    let snippet = message.rsplit("status 400: ").next().unwrap();
    assert_eq!(snippet.len(), 256);
    assert!(snippet.chars().all(|c| c == 'x'));
}

#[tokio::test]
async fn test_error_snippet_keeps_multibyte_characters_whole() {
    let server = MockServer::start().await;
    let body = format!("{}{}", "x".repeat(255), "é".repeat(100));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    let message = err.to_string();
    let snippet = message.rsplit("status 400: ").next().unwrap();
    assert!(snippet.len() <= 256, "{} bytes", snippet.len());
    assert_eq!(snippet, "x".repeat(255));
}

#[tokio::test]
async fn test_mid_pagination_failure_reports_page_index() {
    let server = MockServer::start().await;
    let next = format!("{}/prices/page2", server.uri());
    Mock::given(path("/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "A", 1.0)], Some(next.clone()))))
        .mount(&server)
        .await;
    Mock::given(path("/prices/page2"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let client = PricingClient::new(config(&server).with_logger(logger.clone())).unwrap();
    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    assert!(err.is(ErrorKind::RequestFailed));
    assert_eq!(err.page(), Some(1));
    assert!(
        err.to_string()
            .starts_with("query [region=eastus sku=Standard_B1s] page 1: "),
        "{err}"
    );

    let errors = logger.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get("page"), Some(&FieldValue::UInt(1)));
    assert_eq!(errors[0].get("url"), Some(&FieldValue::Str(next)));
    assert_eq!(errors[0].get("status"), Some(&FieldValue::UInt(502)));
}

#[tokio::test]
async fn test_cancelled_context_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "A", 1.0)], None)))
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = client.get_prices(&ctx, &vm_query()).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.kind(), None);
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_cancellation_during_backoff_returns_promptly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).insert_header("Retry-After", "3600"))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let client = PricingClient::new(
        config(&server)
            .with_retry_max(3)
            .with_retry_wait(Duration::from_secs(1), Duration::from_secs(3600))
            .with_logger(logger.clone()),
    )
    .unwrap();

    let ctx = RequestContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let err = client.get_prices(&ctx, &vm_query()).await.unwrap_err();

    assert!(err.is_cancelled(), "{err}");
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(request_count(&server).await, 1);

    let errors = logger.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, Severity::Debug);
    assert_eq!(errors[0].get("error_category"), Some(&FieldValue::Str("canceled".into())));
}

#[tokio::test]
async fn test_deadline_interrupts_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![item("eastus", "A", 1.0)], None))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    let ctx = RequestContext::new().with_timeout(Duration::from_millis(200));

    let err = client.get_prices(&ctx, &vm_query()).await.unwrap_err();
    assert!(err.is_deadline_exceeded(), "{err}");
    assert_eq!(tonic::Status::from(err).code(), tonic::Code::DeadlineExceeded);
}

#[tokio::test]
async fn test_injected_backoff_sees_attempts_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "A", 1.0)], None)))
        .mount(&server)
        .await;

    let seen: Arc<Mutex<Vec<(u32, Option<String>)>>> = Arc::default();
    let recorder = seen.clone();
    let backoff = move |_min: Duration, _max: Duration, attempt: u32, headers: Option<&HeaderMap>| {
        let hint = headers
            .and_then(|h| h.get("retry-after"))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        recorder.lock().unwrap().push((attempt, hint));
        Duration::ZERO
    };

    let client = PricingClient::new(config(&server).with_retry_max(3).with_backoff(Arc::new(backoff))).unwrap();
    client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(0, Some("1".to_string())), (1, Some("1".to_string()))]
    );
}

#[tokio::test]
async fn test_concurrent_queries_share_client() {
    let server = MockServer::start().await;
    for region in ["eastus", "westus", "northeurope", "uksouth"] {
        Mock::given(query_param("$filter", format!("armRegionName eq '{}'", region)))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item(region, "A", 1.0)], None)))
            .mount(&server)
            .await;
    }

    let client = Arc::new(PricingClient::new(config(&server)).unwrap());
    let mut handles = Vec::new();
    for region in ["eastus", "westus", "northeurope", "uksouth"] {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let query = PriceQuery::new().region(region);
            let items = client.get_prices(&RequestContext::new(), &query).await.unwrap();
            (region, items)
        }));
    }

    for handle in handles {
        let (region, items) = handle.await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].arm_region_name, region);
    }
}

#[tokio::test]
async fn test_close_is_idempotent_and_client_stays_usable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "A", 1.0)], None)))
        .mount(&server)
        .await;

    let client = PricingClient::new(config(&server)).unwrap();
    client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap();

    client.close();
    client.close();

    assert!(client.get_prices(&RequestContext::new(), &vm_query()).await.is_ok());
}

#[tokio::test]
async fn test_unreachable_host_is_request_failed() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let logger = Arc::new(RecordingLogger::default());
    let config = ClientConfig::new()
        .with_base_url(format!("http://{}/prices", addr))
        .with_retry_max(1)
        .with_retry_wait(Duration::from_millis(1), Duration::from_millis(2))
        .with_logger(logger.clone());
    let client = PricingClient::new(config).unwrap();

    let err = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap_err();

    assert!(err.is(ErrorKind::RequestFailed));
    assert!(err.to_string().contains("giving up after 2 attempt(s)"), "{err}");
    assert_eq!(err.status(), None);
    assert_eq!(logger.errors()[0].level, Severity::Debug);
}

#[tokio::test]
async fn test_transport_error_then_success_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![item("eastus", "A", 1.0)], None))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item("eastus", "A", 1.0)], None)))
        .mount(&server)
        .await;

    let logger = Arc::new(RecordingLogger::default());
    let client = PricingClient::new(
        config(&server)
            .with_timeout(Duration::from_millis(200))
            .with_retry_max(2)
            .with_logger(logger.clone()),
    )
    .unwrap();

    let items = client.get_prices(&RequestContext::new(), &vm_query()).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(request_count(&server).await, 2);

    let records = logger.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "retrying request");
    assert_eq!(records[0].get("attempt"), Some(&FieldValue::UInt(1)));
    assert!(records[0].get("error").is_some());
    assert_eq!(records[0].get("status"), None);
}

#[test]
fn test_invalid_config_rejected() {
    let cases = [
        ClientConfig::new().with_timeout(Duration::ZERO),
        ClientConfig::new().with_retry_wait(Duration::from_secs(10), Duration::from_secs(1)),
        ClientConfig::new().with_max_pages(0),
        ClientConfig::new().with_base_url("::not a url::"),
        ClientConfig::new().with_user_agent("bad\nagent"),
    ];

    for config in cases {
        let err = PricingClient::new(config).unwrap_err();
        assert!(err.is(ErrorKind::InvalidConfig), "{err}");
    }
}
