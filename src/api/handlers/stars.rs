//! `POST /star`: store a record and echo it back from the store

use axum::extract::State;
use tracing::{debug, warn};

use crate::api::middleware::RequestSpan;
use crate::api::state::AppState;
use crate::api::types::{ApiError, CreateStarRequest, Json, StarResponse};
use crate::domain::DomainError;

/// Validate the body, insert it, then read the stored record back.
///
/// Span layout: `call-store` wraps both store calls, `post-record` wraps the
/// insert and `get-record` is nested inside it around the read-back.
pub async fn add_star(
    State(state): State<AppState>,
    RequestSpan(root): RequestSpan,
    Json(request): Json<CreateStarRequest>,
) -> Result<Json<StarResponse>, ApiError> {
    let star = request.into_new_star()?;
    let stars = state.star_repository()?;

    let call = state.spans.start_child("call-store", &root);
    call.set_tag("star.name", star.name.clone());

    let post = state.spans.start_child("post-record", &call);
    let id = stars.insert(star).await.inspect_err(|e| {
        warn!(error = %e, "Failed to insert star");
        post.mark_error(e.to_string());
    })?;
    post.set_tag("record.id", id.to_string());

    let stored = {
        let get = state.spans.start_child("get-record", &post);
        get.set_tag("record.id", id.to_string());

        let stored = stars.find_by_id(&id).await.inspect_err(|e| {
            warn!(error = %e, record_id = %id, "Failed to read back star");
            get.mark_error(e.to_string());
        })?;

        stored.ok_or_else(|| {
            get.mark_error("record missing after insert");
            DomainError::not_found(format!("Star '{}' not found after insert", id))
        })?
    };
    post.end();
    call.end();

    state.metrics.record_invocation("star");
    debug!(record_id = %id, name = %stored.name(), "Stored star");

    Ok(Json(StarResponse::from(&stored)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use opentelemetry_sdk::{testing::trace::InMemorySpanExporter, trace::TracerProvider};
    use serde_json::Number;

    use super::*;
    use crate::domain::star::mock::MockStarRepository;
    use crate::domain::{ServiceFlavour, ServiceProfile};
    use crate::infrastructure::observability::{MetricsRecorder, SpanEmitter, SpanHandle};

    fn state(repo: Arc<MockStarRepository>) -> (AppState, InMemorySpanExporter, TracerProvider) {
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let state = AppState::new(
            ServiceProfile::new(ServiceFlavour::Backend),
            SpanEmitter::new(&provider),
            MetricsRecorder::new("test"),
        )
        .with_star_repository(repo);

        (state, exporter, provider)
    }

    fn request(name: Option<&str>, distance: Option<f64>) -> Json<CreateStarRequest> {
        Json(CreateStarRequest {
            name: name.map(str::to_string),
            distance: distance.and_then(Number::from_f64),
        })
    }

    #[tokio::test]
    async fn test_add_star_round_trip() {
        let repo = Arc::new(MockStarRepository::new());
        let (state, exporter, _provider) = state(repo.clone());
        let metrics = state.metrics.clone();

        let Json(response) = add_star(
            State(state),
            RequestSpan(SpanHandle::detached()),
            request(Some("Sirius"), Some(8.6)),
        )
        .await
        .unwrap();

        assert_eq!(response.result.name, "Sirius");
        assert_eq!(response.result.distance.to_string(), "8.6");
        assert_eq!(repo.insert_count(), 1);
        assert!(metrics.render().contains("invocation_by_type{item_type=\"star\"} 1"));

        let names: Vec<String> = exporter
            .get_finished_spans()
            .unwrap()
            .iter()
            .map(|s| s.name.to_string())
            .collect();
        assert_eq!(names, vec!["get-record", "post-record", "call-store"]);
    }

    #[tokio::test]
    async fn test_get_record_nested_in_post_record() {
        let (state, exporter, _provider) = state(Arc::new(MockStarRepository::new()));
        let root = state.spans.start_root("POST /star", &Default::default());

        add_star(State(state.clone()), RequestSpan(root.handle()), request(Some("Vega"), Some(25.0)))
            .await
            .unwrap();
        root.end();

        let spans = exporter.get_finished_spans().unwrap();
        let find = |name: &str| spans.iter().find(|s| s.name == name).unwrap();

        assert_eq!(find("call-store").parent_span_id, find("POST /star").span_context.span_id());
        assert_eq!(find("post-record").parent_span_id, find("call-store").span_context.span_id());
        assert_eq!(find("get-record").parent_span_id, find("post-record").span_context.span_id());
    }

    #[tokio::test]
    async fn test_missing_distance_never_touches_store() {
        let repo = Arc::new(MockStarRepository::new());
        let (state, exporter, _provider) = state(repo.clone());

        let err = add_star(State(state), RequestSpan(SpanHandle::detached()), request(Some("Vega"), None))
            .await
            .unwrap_err();

        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param.as_deref(), Some("distance"));
        assert_eq!(repo.insert_count(), 0);
        assert!(exporter.get_finished_spans().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let repo = Arc::new(MockStarRepository::new().with_error("connection refused"));
        let (state, exporter, _provider) = state(repo);

        let err = add_star(State(state), RequestSpan(SpanHandle::detached()), request(Some("Vega"), Some(25.0)))
            .await
            .unwrap_err();

        assert_eq!(err.status, axum::http::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.kind, "store_unavailable");

        let spans = exporter.get_finished_spans().unwrap();
        let post = spans.iter().find(|s| s.name == "post-record").unwrap();
        assert!(post.attributes.iter().any(|kv| kv.key.as_str() == "error"));
    }

    #[tokio::test]
    async fn test_lost_record_is_not_found() {
        let repo = Arc::new(MockStarRepository::new().forgetful());
        let (state, _exporter, _provider) = state(repo.clone());

        let err = add_star(State(state), RequestSpan(SpanHandle::detached()), request(Some("Vega"), Some(25.0)))
            .await
            .unwrap_err();

        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
        assert_eq!(repo.insert_count(), 1);
    }
}
