//! `GET /trace`: fetch upstream job listings and clean them up

use axum::extract::State;
use tracing::{error, info};

use crate::api::middleware::RequestSpan;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Job, JobItemError, ListingBatch};
use crate::infrastructure::observability::{KeyValue, SpanHandle};

pub async fn trace_jobs(
    State(state): State<AppState>,
    RequestSpan(root): RequestSpan,
) -> Result<Json<Vec<Job>>, ApiError> {
    let source = state.job_source()?;

    let fetch = state.spans.start_child("get-python-jobs", &root);
    let batch = source
        .fetch_listings(fetch.trace_headers())
        .await
        .inspect_err(|e| {
            error!(error = %e, "Failed to fetch job listings");
            fetch.mark_error(e.to_string());
        })?;

    let count = batch.listings.len() as i64;
    fetch.log_event(
        "get jobs count",
        vec![
            KeyValue::new("event", "get jobs count"),
            KeyValue::new("count", count),
        ],
    );
    fetch.set_tag("jobs-count", count);

    let jobs = convert_listings(&state, &fetch, &batch)
        .into_iter()
        .filter_map(Result::ok)
        .collect();

    Ok(Json(jobs))
}

/// Convert every listing under its own `request-site` span; a bad listing
/// is logged and tagged on its span but never aborts the batch
fn convert_listings(
    state: &AppState,
    parent: &SpanHandle,
    batch: &ListingBatch,
) -> Vec<Result<Job, JobItemError>> {
    batch
        .listings
        .iter()
        .map(|listing| {
            let company = Job::company_of(listing);
            let site = state.spans.start_child("request-site", parent);
            info!(company = %company, "Getting website for {}", company);

            state.metrics.record_invocation("job");
            let result = Job::from_listing(listing);

            site.set_tag("http.status_code", i64::from(batch.status));
            site.set_tag("company-site", company);
            if let Err(e) = &result {
                error!(company = %e.company, reason = %e.reason, "Unable to get site for {}", e.company);
                site.mark_error(e.to_string());
            }

            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use opentelemetry::Value;
    use opentelemetry_sdk::{testing::trace::InMemorySpanExporter, trace::TracerProvider};
    use serde_json::json;

    use super::*;
    use crate::domain::job::mock::MockJobSource;
    use crate::domain::{DomainError, ServiceFlavour, ServiceProfile};
    use crate::infrastructure::observability::{MetricsRecorder, SpanEmitter};

    fn listing(company: &str) -> serde_json::Value {
        json!({
            "description": "<p>Build <em>services</em></p>",
            "company": company,
            "company_url": null,
            "created_at": "Mon Jun 01 12:00:00 UTC 2020",
            "how_to_apply": "<a href=\"https://example.org\">apply</a>",
            "location": "Remote",
            "title": "Python Developer",
            "type": "Full Time",
            "url": "https://example.org/jobs/1"
        })
    }

    fn state(source: Arc<MockJobSource>) -> (AppState, InMemorySpanExporter, TracerProvider) {
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let state = AppState::new(
            ServiceProfile::new(ServiceFlavour::Trial),
            SpanEmitter::new(&provider),
            MetricsRecorder::new("test"),
        )
        .with_job_source(source);

        (state, exporter, provider)
    }

    #[tokio::test]
    async fn test_malformed_item_skipped() {
        let mut broken = listing("Initech");
        broken.as_object_mut().unwrap().remove("title");
        let source = Arc::new(MockJobSource::with_listings(vec![
            listing("Acme"),
            broken,
            listing("Globex"),
        ]));
        let (state, exporter, _provider) = state(source);
        let metrics = state.metrics.clone();

        let Json(jobs) = trace_jobs(State(state), RequestSpan(SpanHandle::detached()))
            .await
            .unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[0].description, "Build services");
        assert_eq!(jobs[1].company, "Globex");
        assert!(metrics.render().contains("invocation_by_type{item_type=\"job\"} 3"));

        let spans = exporter.get_finished_spans().unwrap();
        let sites: Vec<_> = spans.iter().filter(|s| s.name == "request-site").collect();
        assert_eq!(sites.len(), 3);

        let failed = sites
            .iter()
            .find(|s| {
                s.attributes
                    .iter()
                    .any(|kv| kv.key.as_str() == "company-site" && kv.value == Value::from("Initech"))
            })
            .unwrap();
        assert!(failed
            .attributes
            .iter()
            .any(|kv| kv.key.as_str() == "error" && kv.value == Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_fetch_span_counts_jobs() {
        let source = Arc::new(MockJobSource::with_listings(vec![listing("Acme")]));
        let (state, exporter, _provider) = state(source);

        trace_jobs(State(state), RequestSpan(SpanHandle::detached()))
            .await
            .unwrap();

        let spans = exporter.get_finished_spans().unwrap();
        let fetch = spans.iter().find(|s| s.name == "get-python-jobs").unwrap();

        assert!(fetch
            .attributes
            .iter()
            .any(|kv| kv.key.as_str() == "jobs-count" && kv.value == Value::I64(1)));
        assert_eq!(fetch.events.events.len(), 1);
        assert_eq!(fetch.events.events[0].name, "get jobs count");
    }

    #[tokio::test]
    async fn test_trace_headers_forwarded() {
        let source = Arc::new(MockJobSource::with_listings(vec![]));
        let (state, _exporter, _provider) = state(source.clone());
        let root = state.spans.start_root("GET /trace", &Default::default());

        trace_jobs(State(state.clone()), RequestSpan(root.handle()))
            .await
            .unwrap();

        let seen = source.seen_headers();
        assert_eq!(seen.len(), 1);
        assert!(seen[0]
            .iter()
            .any(|(name, value)| name == "traceparent" && value.contains(&root.trace_id())));
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_bad_gateway() {
        let source = Arc::new(MockJobSource::with_error(DomainError::upstream_status(
            "job-listings",
            503,
            "HTTP 503",
        )));
        let (state, _exporter, _provider) = state(source);

        let err = trace_jobs(State(state), RequestSpan(SpanHandle::detached()))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.kind, "upstream_fetch");
    }
}
