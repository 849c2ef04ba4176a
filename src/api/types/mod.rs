//! Request/response types shared by the handlers

pub mod error;
pub mod json;
pub mod star;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType, ErrorTag};
pub use json::Json;
pub use star::{CreateStarRequest, StarResponse, StarResult};
