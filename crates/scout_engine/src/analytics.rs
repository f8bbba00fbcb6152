use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use scout_core::AnalyticsEvent;
use scout_logging::scout_info;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("invalid collector endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("collector responded with status {0}")]
    HttpStatus(u16),
    #[error("network error: {0}")]
    Network(String),
}

/// Fire-and-forget destination for analytics events. Failures are reported to
/// the caller for logging only.
#[async_trait::async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn track(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError>;
}

/// Writes events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait::async_trait]
impl AnalyticsSink for LogSink {
    async fn track(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        scout_info!(
            "analytics category={} action={} label={}",
            event.category,
            event.action,
            event.label
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    site: &'a str,
    category: &'a str,
    action: &'a str,
    label: &'a str,
    sent_utc: String,
}

/// Posts events as JSON to a collector endpoint.
pub struct HttpCollector {
    client: reqwest::Client,
    endpoint: url::Url,
    site: String,
    sent_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

impl HttpCollector {
    pub fn new(
        endpoint: &str,
        site: impl Into<String>,
        sent_utc: Arc<dyn Fn() -> String + Send + Sync>,
    ) -> Result<Self, AnalyticsError> {
        let endpoint = url::Url::parse(endpoint)
            .map_err(|err| AnalyticsError::InvalidEndpoint(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| AnalyticsError::Network(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            site: site.into(),
            sent_utc,
        })
    }
}

#[async_trait::async_trait]
impl AnalyticsSink for HttpCollector {
    async fn track(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        let payload = Payload {
            site: &self.site,
            category: &event.category,
            action: &event.action,
            label: &event.label,
            sent_utc: (self.sent_utc)(),
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|err| AnalyticsError::Network(err.to_string()))?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| AnalyticsError::Network(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AnalyticsError::HttpStatus(status.as_u16()))
        }
    }
}
