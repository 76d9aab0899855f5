//! Visited places domain service.
//!
//! Implements [`VisitedPlaces`] on top of a [`VisitedRepository`]. The service
//! owns the upsert rule: a create for a name that already exists on the same
//! map (ignoring case) updates that record instead of adding a second one.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UpsertOutcome, VisitedPlaces, VisitedRepository, VisitedRepositoryError};
use crate::domain::{Error, VisitedDraft, VisitedPatch, VisitedPlace, WhichMap};

/// Visited places service backed by a repository.
#[derive(Clone)]
pub struct VisitedPlacesService<R> {
    repo: Arc<R>,
}

impl<R> VisitedPlacesService<R> {
    /// Create a new service over `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> VisitedPlacesService<R>
where
    R: VisitedRepository,
{
    fn map_repo_error(error: VisitedRepositoryError) -> Error {
        match error {
            VisitedRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("visited repository unavailable: {message}"))
            }
            VisitedRepositoryError::Query { message } => {
                Error::internal(format!("visited repository error: {message}"))
            }
            VisitedRepositoryError::Constraint { message } => Error::conflict(message),
        }
    }

    fn not_found(id: Uuid) -> Error {
        Error::not_found(format!("visited place {id} not found"))
    }

    async fn find_by_name(
        &self,
        which_map: WhichMap,
        name: &str,
    ) -> Result<Option<VisitedPlace>, Error> {
        self.repo
            .find_by_name(which_map, name)
            .await
            .map_err(Self::map_repo_error)
    }

    async fn merge_into(
        &self,
        mut existing: VisitedPlace,
        draft: &VisitedDraft,
    ) -> Result<UpsertOutcome, Error> {
        existing.apply_flags(draft.flags());
        let found = self
            .repo
            .update(&existing)
            .await
            .map_err(Self::map_repo_error)?;
        if !found {
            return Err(Error::conflict(format!(
                "visited place '{}' changed concurrently; retry",
                draft.name()
            )));
        }
        Ok(UpsertOutcome::Updated(existing))
    }
}

#[async_trait]
impl<R> VisitedPlaces for VisitedPlacesService<R>
where
    R: VisitedRepository,
{
    async fn list(&self, which_map: WhichMap) -> Result<Vec<VisitedPlace>, Error> {
        self.repo.list(which_map).await.map_err(Self::map_repo_error)
    }

    async fn get(&self, id: Uuid) -> Result<VisitedPlace, Error> {
        self.repo
            .find(id)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn upsert(&self, draft: VisitedDraft) -> Result<UpsertOutcome, Error> {
        if let Some(existing) = self.find_by_name(draft.which_map(), draft.name()).await? {
            return self.merge_into(existing, &draft).await;
        }

        let place = draft.clone().into_place(Uuid::new_v4());
        match self.repo.insert(&place).await {
            Ok(()) => Ok(UpsertOutcome::Created(place)),
            Err(VisitedRepositoryError::Constraint { message }) => {
                debug!(name = draft.name(), %message, "concurrent create; merging into winner");
                let winner = self
                    .find_by_name(draft.which_map(), draft.name())
                    .await?
                    .ok_or_else(|| Error::conflict(message))?;
                self.merge_into(winner, &draft).await
            }
            Err(err) => Err(Self::map_repo_error(err)),
        }
    }

    async fn update(&self, id: Uuid, patch: VisitedPatch) -> Result<VisitedPlace, Error> {
        let mut place = self.get(id).await?;
        let renamed = patch.name.is_some() || patch.which_map.is_some();
        place.apply(patch);

        if renamed {
            if let Some(other) = self.find_by_name(place.which_map, &place.name).await? {
                if other.id != id {
                    return Err(Error::conflict(format!(
                        "'{}' already exists on the {} map",
                        place.name, place.which_map
                    )));
                }
            }
        }

        let found = self
            .repo
            .update(&place)
            .await
            .map_err(Self::map_repo_error)?;
        if !found {
            return Err(Self::not_found(id));
        }
        Ok(place)
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let found = self.repo.delete(id).await.map_err(Self::map_repo_error)?;
        if found { Ok(()) } else { Err(Self::not_found(id)) }
    }
}

#[cfg(test)]
#[path = "visited_service_tests.rs"]
mod tests;
