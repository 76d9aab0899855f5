//! Driving port for the visited places use-cases.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, VisitedDraft, VisitedPatch, VisitedPlace, WhichMap};

/// Result of a create-or-update by natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No place with that name existed on the map.
    Created(VisitedPlace),
    /// An existing place was updated in place.
    Updated(VisitedPlace),
}

impl UpsertOutcome {
    #[must_use]
    pub fn place(&self) -> &VisitedPlace {
        match self {
            Self::Created(place) | Self::Updated(place) => place,
        }
    }

    #[must_use]
    pub fn into_place(self) -> VisitedPlace {
        match self {
            Self::Created(place) | Self::Updated(place) => place,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitedPlaces: Send + Sync {
    async fn list(&self, which_map: WhichMap) -> Result<Vec<VisitedPlace>, Error>;

    /// `not_found` when the id is unknown.
    async fn get(&self, id: Uuid) -> Result<VisitedPlace, Error>;

    /// Create the place, or merge the supplied flags into the existing place
    /// with the same case-insensitive name on the same map.
    async fn upsert(&self, draft: VisitedDraft) -> Result<UpsertOutcome, Error>;

    /// `not_found` for unknown ids, `conflict` when renaming onto another
    /// place's natural key.
    async fn update(&self, id: Uuid, patch: VisitedPatch) -> Result<VisitedPlace, Error>;

    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}

/// Fixture implementation with no places.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVisitedPlaces;

#[async_trait]
impl VisitedPlaces for FixtureVisitedPlaces {
    async fn list(&self, _which_map: WhichMap) -> Result<Vec<VisitedPlace>, Error> {
        Ok(Vec::new())
    }

    async fn get(&self, _id: Uuid) -> Result<VisitedPlace, Error> {
        Err(Error::not_found("visited place not found"))
    }

    async fn upsert(&self, draft: VisitedDraft) -> Result<UpsertOutcome, Error> {
        Ok(UpsertOutcome::Created(draft.into_place(Uuid::new_v4())))
    }

    async fn update(&self, _id: Uuid, _patch: VisitedPatch) -> Result<VisitedPlace, Error> {
        Err(Error::not_found("visited place not found"))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("visited place not found"))
    }
}
