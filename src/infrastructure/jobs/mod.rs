//! Upstream job listing sources

mod http_source;

pub use http_source::{HttpJobSource, JOBS_UPSTREAM};
