//! Domain layer - Core entities, errors and the seams to external services

pub mod error;
pub mod job;
pub mod service;
pub mod star;

pub use error::DomainError;
pub use job::{Job, JobItemError, JobSource, ListingBatch};
pub use service::{ServiceFlavour, ServiceProfile};
pub use star::{NewStar, Star, StarId, StarRepository};
