//! Observed reference services
//!
//! One binary serving three flavours of a small instrumented web service:
//! - `backend`: record API backed by a document store
//! - `front`: static page renderer
//! - `trial`: upstream job listing fetcher
//!
//! Every observed request gets a root span, child spans around its store or
//! upstream calls, and Prometheus request metrics.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::jobs::HttpJobSource;
use infrastructure::observability::{MetricsRecorder, Telemetry};
use infrastructure::storage::StoreFactory;
use tracing::info;

/// Create the application state for the configured flavour
pub async fn create_app_state_with_config(
    config: &AppConfig,
    telemetry: &Telemetry,
) -> anyhow::Result<AppState> {
    let profile = config.service_profile();
    let flavour = profile.flavour;
    let metrics = MetricsRecorder::new(&profile.version);

    let mut state = AppState::new(profile, telemetry.span_emitter(), metrics);

    if flavour.needs_store() {
        info!("Connecting to record store...");
        let stars = StoreFactory::connect(&config.store).await?;
        state = state.with_star_repository(stars);
    }

    if flavour.needs_job_source() {
        let jobs = HttpJobSource::new(&config.jobs)?;
        info!(url = %config.jobs.listing_url, "Job listing source configured");
        state = state.with_job_source(Arc::new(jobs));
    }

    Ok(state)
}
