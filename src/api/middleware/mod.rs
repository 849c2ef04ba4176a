//! HTTP middleware

mod logging;
mod observe;

pub use logging::logging_middleware;
pub use observe::{RequestSpan, observe_request};
