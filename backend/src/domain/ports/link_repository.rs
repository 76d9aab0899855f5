//! Driven port for travel link persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Link, LinkDraft};

use super::define_port_error;

define_port_error! {
    /// Errors raised by link repository adapters.
    pub enum LinkRepositoryError {
        /// Backing store could not be reached or opened.
        Connection { message: String } =>
            "link repository connection failed: {message}",
        /// Read or write failed during execution.
        Query { message: String } =>
            "link repository query failed: {message}",
    }
}

/// Port for link storage.
///
/// `create` owns position assignment: adapters compute the next position and
/// store the link under one lock or transaction so two concurrent creates
/// cannot share a position.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// All links ordered by ascending position.
    async fn list(&self) -> Result<Vec<Link>, LinkRepositoryError>;

    /// Fetch a link by id.
    async fn find(&self, id: Uuid) -> Result<Option<Link>, LinkRepositoryError>;

    /// Store a new link at the next free position and return it.
    async fn create(&self, draft: LinkDraft) -> Result<Link, LinkRepositoryError>;

    /// Replace the stored link with the same id. Returns `false` when absent.
    async fn update(&self, link: &Link) -> Result<bool, LinkRepositoryError>;

    /// Remove a link. Returns `false` when absent.
    async fn delete(&self, id: Uuid) -> Result<bool, LinkRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLinkRepository;

#[async_trait]
impl LinkRepository for FixtureLinkRepository {
    async fn list(&self) -> Result<Vec<Link>, LinkRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: Uuid) -> Result<Option<Link>, LinkRepositoryError> {
        Ok(None)
    }

    async fn create(&self, draft: LinkDraft) -> Result<Link, LinkRepositoryError> {
        Ok(draft.into_link(Uuid::new_v4(), 1))
    }

    async fn update(&self, _link: &Link) -> Result<bool, LinkRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, LinkRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_create_assigns_first_position() {
        let draft = LinkDraft::try_new("Trains", "https://trains.example", None).expect("draft");
        let link = FixtureLinkRepository.create(draft).await.expect("fixture create");
        assert_eq!(link.position, 1);
    }
}
