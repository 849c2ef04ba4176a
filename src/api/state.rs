//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, JobSource, ServiceProfile, StarRepository};
use crate::infrastructure::observability::{MetricsRecorder, SpanEmitter};

/// Application state shared by every request, read-only after start-up
#[derive(Clone, Debug)]
pub struct AppState {
    pub profile: Arc<ServiceProfile>,
    pub stars: Option<Arc<dyn StarRepository>>,
    pub jobs: Option<Arc<dyn JobSource>>,
    pub spans: SpanEmitter,
    pub metrics: MetricsRecorder,
}

impl AppState {
    pub fn new(profile: ServiceProfile, spans: SpanEmitter, metrics: MetricsRecorder) -> Self {
        Self {
            profile: Arc::new(profile),
            stars: None,
            jobs: None,
            spans,
            metrics,
        }
    }

    pub fn with_star_repository(mut self, stars: Arc<dyn StarRepository>) -> Self {
        self.stars = Some(stars);
        self
    }

    pub fn with_job_source(mut self, jobs: Arc<dyn JobSource>) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn star_repository(&self) -> Result<&Arc<dyn StarRepository>, DomainError> {
        self.stars.as_ref().ok_or_else(|| {
            DomainError::configuration(format!(
                "The {} flavour has no record store",
                self.profile.flavour
            ))
        })
    }

    pub fn job_source(&self) -> Result<&Arc<dyn JobSource>, DomainError> {
        self.jobs.as_ref().ok_or_else(|| {
            DomainError::configuration(format!(
                "The {} flavour has no job listing source",
                self.profile.flavour
            ))
        })
    }
}
