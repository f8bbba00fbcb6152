use std::sync::Arc;

use scout_core::AnalyticsEvent;
use scout_engine::{AnalyticsError, AnalyticsSink, HttpCollector};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn event() -> AnalyticsEvent {
    AnalyticsEvent {
        category: "search".to_string(),
        action: "search_multiple".to_string(),
        label: "road bike".to_string(),
    }
}

fn collector(endpoint: &str) -> HttpCollector {
    HttpCollector::new(
        endpoint,
        "flipscoutly.com",
        Arc::new(|| "2026-01-01T00:00:00Z".to_string()),
    )
    .unwrap()
}

#[tokio::test]
async fn posts_event_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collect"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "site": "flipscoutly.com",
            "category": "search",
            "action": "search_multiple",
            "label": "road bike",
            "sent_utc": "2026-01-01T00:00:00Z",
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    collector(&format!("{}/collect", server.uri()))
        .track(&event())
        .await
        .unwrap();
}

#[tokio::test]
async fn reports_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = collector(&server.uri()).track(&event()).await.unwrap_err();
    assert_eq!(err, AnalyticsError::HttpStatus(503));
}

#[test]
fn rejects_invalid_endpoint() {
    let result = HttpCollector::new("not a url", "x", Arc::new(String::new));
    assert!(matches!(result, Err(AnalyticsError::InvalidEndpoint(_))));
}
