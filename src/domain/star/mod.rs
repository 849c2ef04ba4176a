//! Star domain - the single record type persisted by the backend flavour

mod entity;
mod repository;

pub use entity::{NewStar, Star, StarId};
pub use repository::StarRepository;

#[cfg(test)]
pub use repository::mock;
