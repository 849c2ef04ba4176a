//! Upstream job listing source

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// Propagation headers attached to outbound requests so the upstream call
/// joins the current trace
pub type TraceHeaders = Vec<(String, String)>;

/// Raw listings together with the HTTP status the upstream answered with
#[derive(Debug, Clone)]
pub struct ListingBatch {
    pub status: u16,
    pub listings: Vec<Value>,
}

/// Source of raw job listings
#[async_trait]
pub trait JobSource: Send + Sync + std::fmt::Debug {
    async fn fetch_listings(&self, headers: TraceHeaders) -> Result<ListingBatch, DomainError>;
}
