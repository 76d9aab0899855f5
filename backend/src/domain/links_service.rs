//! Travel links domain service.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{LinkRepository, LinkRepositoryError, TravelLinks};
use crate::domain::{Error, Link, LinkDraft, LinkPatch};

/// Travel links service backed by a repository.
#[derive(Clone)]
pub struct TravelLinksService<R> {
    repo: Arc<R>,
}

impl<R> TravelLinksService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> TravelLinksService<R>
where
    R: LinkRepository,
{
    fn map_repo_error(error: LinkRepositoryError) -> Error {
        match error {
            LinkRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("link repository unavailable: {message}"))
            }
            LinkRepositoryError::Query { message } => {
                Error::internal(format!("link repository error: {message}"))
            }
        }
    }

    fn not_found(id: Uuid) -> Error {
        Error::not_found(format!("link {id} not found"))
    }
}

#[async_trait]
impl<R> TravelLinks for TravelLinksService<R>
where
    R: LinkRepository,
{
    async fn list(&self) -> Result<Vec<Link>, Error> {
        let mut links = self.repo.list().await.map_err(Self::map_repo_error)?;
        links.sort_by_key(|link| link.position);
        Ok(links)
    }

    async fn create(&self, draft: LinkDraft) -> Result<Link, Error> {
        self.repo.create(draft).await.map_err(Self::map_repo_error)
    }

    async fn update(&self, id: Uuid, patch: LinkPatch) -> Result<Link, Error> {
        let mut link = self
            .repo
            .find(id)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(|| Self::not_found(id))?;
        link.apply(patch);
        let found = self.repo.update(&link).await.map_err(Self::map_repo_error)?;
        if !found {
            return Err(Self::not_found(id));
        }
        Ok(link)
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let found = self.repo.delete(id).await.map_err(Self::map_repo_error)?;
        if found { Ok(()) } else { Err(Self::not_found(id)) }
    }
}
