//! Driven port for visited place persistence.
//!
//! Adapters store [`VisitedPlace`] records and must honour the natural key
//! (`lower(name)`, `which_map`): `find_by_name` compares names without regard
//! to case, and an `insert` that would duplicate the key fails with
//! [`VisitedRepositoryError::Constraint`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{VisitedPlace, WhichMap};

use super::define_port_error;

define_port_error! {
    /// Errors raised by visited place repository adapters.
    pub enum VisitedRepositoryError {
        /// Backing store could not be reached or opened.
        Connection { message: String } =>
            "visited repository connection failed: {message}",
        /// Read or write failed during execution.
        Query { message: String } =>
            "visited repository query failed: {message}",
        /// Write violated the natural key.
        Constraint { message: String } =>
            "visited repository constraint violated: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitedRepository: Send + Sync {
    /// Places on one map, in storage order.
    async fn list(&self, which_map: WhichMap) -> Result<Vec<VisitedPlace>, VisitedRepositoryError>;

    /// Fetch a place by id.
    async fn find(&self, id: Uuid) -> Result<Option<VisitedPlace>, VisitedRepositoryError>;

    /// Fetch a place by its natural key; `name` matches case-insensitively.
    async fn find_by_name(
        &self,
        which_map: WhichMap,
        name: &str,
    ) -> Result<Option<VisitedPlace>, VisitedRepositoryError>;

    /// Store a new place.
    async fn insert(&self, place: &VisitedPlace) -> Result<(), VisitedRepositoryError>;

    /// Replace the stored place with the same id. Returns `false` when no such
    /// place exists.
    async fn update(&self, place: &VisitedPlace) -> Result<bool, VisitedRepositoryError>;

    /// Remove a place. Returns `false` when no such place exists.
    async fn delete(&self, id: Uuid) -> Result<bool, VisitedRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVisitedRepository;

#[async_trait]
impl VisitedRepository for FixtureVisitedRepository {
    async fn list(&self, _which_map: WhichMap) -> Result<Vec<VisitedPlace>, VisitedRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: Uuid) -> Result<Option<VisitedPlace>, VisitedRepositoryError> {
        Ok(None)
    }

    async fn find_by_name(
        &self,
        _which_map: WhichMap,
        _name: &str,
    ) -> Result<Option<VisitedPlace>, VisitedRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _place: &VisitedPlace) -> Result<(), VisitedRepositoryError> {
        Ok(())
    }

    async fn update(&self, _place: &VisitedPlace) -> Result<bool, VisitedRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, VisitedRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_repository_is_empty() {
        let repo = FixtureVisitedRepository;
        let places = repo.list(WhichMap::World).await.expect("fixture list");
        assert!(places.is_empty());
        assert!(!repo.delete(Uuid::new_v4()).await.expect("fixture delete"));
    }

    #[rstest]
    fn constraint_error_formats_message() {
        let err = VisitedRepositoryError::constraint("duplicate France on world");
        assert!(err.to_string().contains("duplicate France on world"));
    }
}
