//! Job listings fetched over HTTP

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::JobsConfig;
use crate::domain::DomainError;
use crate::domain::job::{JobSource, ListingBatch, TraceHeaders};

/// Name used for the listing upstream in errors and span tags
pub const JOBS_UPSTREAM: &str = "job-listings";

/// Listing source reading a JSON array from a fixed URL
#[derive(Debug, Clone)]
pub struct HttpJobSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpJobSource {
    pub fn new(config: &JobsConfig) -> Result<Self, DomainError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.listing_url.clone(),
            timeout,
        })
    }

    fn classify(&self, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            DomainError::upstream_timeout(JOBS_UPSTREAM, self.timeout)
        } else if error.is_decode() {
            DomainError::upstream(JOBS_UPSTREAM, format!("Failed to parse listings: {}", error))
        } else {
            DomainError::upstream(JOBS_UPSTREAM, format!("Request failed: {}", error))
        }
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn fetch_listings(&self, headers: TraceHeaders) -> Result<ListingBatch, DomainError> {
        let mut request = self.client.get(&self.url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::upstream_status(
                JOBS_UPSTREAM,
                status.as_u16(),
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        let body: Value = response.json().await.map_err(|e| self.classify(e))?;

        match body {
            Value::Array(listings) => Ok(ListingBatch {
                status: status.as_u16(),
                listings,
            }),
            other => Err(DomainError::upstream(
                JOBS_UPSTREAM,
                format!("Expected a JSON array of listings, got {}", json_type(&other)),
            )),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
