//! Star repository trait

use async_trait::async_trait;

use super::{NewStar, Star, StarId};
use crate::domain::DomainError;

/// Narrow client for the external document store holding stars
#[async_trait]
pub trait StarRepository: Send + Sync + std::fmt::Debug {
    /// Insert a star, returning the identifier assigned by the store
    async fn insert(&self, star: NewStar) -> Result<StarId, DomainError>;

    /// Fetch a star by its store-assigned identifier
    async fn find_by_id(&self, id: &StarId) -> Result<Option<Star>, DomainError>;

    /// Cheap connectivity check used by the readiness probe
    async fn ping(&self) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock repository that counts writes and can be told to fail
    #[derive(Debug, Default)]
    pub struct MockStarRepository {
        stars: Mutex<HashMap<StarId, Star>>,
        error: Mutex<Option<String>>,
        forget_writes: bool,
        inserts: AtomicUsize,
    }

    impl MockStarRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        /// Accept inserts but never return them on read-back
        pub fn forgetful(mut self) -> Self {
            self.forget_writes = true;
            self
        }

        pub fn insert_count(&self) -> usize {
            self.inserts.load(Ordering::SeqCst)
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl StarRepository for MockStarRepository {
        async fn insert(&self, star: NewStar) -> Result<StarId, DomainError> {
            self.check_error()?;
            self.inserts.fetch_add(1, Ordering::SeqCst);

            let id = StarId::from_uuid(uuid::Uuid::new_v4());
            if !self.forget_writes {
                self.stars.lock().unwrap().insert(id, Star::new(id, star));
            }
            Ok(id)
        }

        async fn find_by_id(&self, id: &StarId) -> Result<Option<Star>, DomainError> {
            self.check_error()?;
            Ok(self.stars.lock().unwrap().get(id).cloned())
        }

        async fn ping(&self) -> Result<(), DomainError> {
            self.check_error()
        }
    }
}
