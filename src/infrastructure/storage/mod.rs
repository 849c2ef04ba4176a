//! Record store implementations

mod factory;
mod in_memory;
mod postgres;
mod timed;

/// Name used for the store in timeout errors and span tags
pub const STORE_UPSTREAM: &str = "record-store";

pub use factory::{StorageType, StoreFactory, StoreUri, validate_collection_name};
pub use in_memory::InMemoryStarRepository;
pub use postgres::{PostgresConfig, PostgresStarRepository};
pub use timed::TimedStarRepository;
