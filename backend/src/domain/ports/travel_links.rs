//! Driving port for the travel links use-cases.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Link, LinkDraft, LinkPatch};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TravelLinks: Send + Sync {
    /// Links ordered by position.
    async fn list(&self) -> Result<Vec<Link>, Error>;

    /// Store a link after every existing one.
    async fn create(&self, draft: LinkDraft) -> Result<Link, Error>;

    async fn update(&self, id: Uuid, patch: LinkPatch) -> Result<Link, Error>;

    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}

/// Fixture implementation with no links.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTravelLinks;

#[async_trait]
impl TravelLinks for FixtureTravelLinks {
    async fn list(&self) -> Result<Vec<Link>, Error> {
        Ok(Vec::new())
    }

    async fn create(&self, draft: LinkDraft) -> Result<Link, Error> {
        Ok(draft.into_link(Uuid::new_v4(), 1))
    }

    async fn update(&self, _id: Uuid, _patch: LinkPatch) -> Result<Link, Error> {
        Err(Error::not_found("link not found"))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), Error> {
        Err(Error::not_found("link not found"))
    }
}
