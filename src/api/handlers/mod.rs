//! Route handlers

pub mod jobs;
pub mod pages;
pub mod stars;

pub use jobs::trace_jobs;
pub use pages::{client_error_page, client_success_page, homepage, my_api, server_error_page};
pub use stars::add_star;
