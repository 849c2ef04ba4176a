//! Infrastructure layer - External service implementations

pub mod jobs;
pub mod logging;
pub mod observability;
pub mod storage;
