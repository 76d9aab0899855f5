//! PostgreSQL-backed `LinkRepository`.
//!
//! `create` takes an exclusive table lock inside a transaction before reading
//! `max(position)`, so two concurrent creates cannot share a position. The
//! issued position is recorded in `link_position_counter` within the same
//! transaction, so deleting the last link never frees its position.

use async_trait::async_trait;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{LinkRepository, LinkRepositoryError};
use crate::domain::{Link, LinkDraft, next_position};

use super::diesel_error_mapping::{StorageFailure, classify};
use super::models::LinkRow;
use super::pool::DbPool;
use super::schema::{link_position_counter, links};

/// Diesel implementation of the travel links port.
#[derive(Clone)]
pub struct DieselLinkRepository {
    pool: DbPool,
}

impl DieselLinkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StorageFailure>) -> LinkRepositoryError {
    match failure.into() {
        StorageFailure::Connection(message) => LinkRepositoryError::connection(message),
        StorageFailure::Constraint(message) | StorageFailure::Query(message) => {
            LinkRepositoryError::query(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> LinkRepositoryError {
    map_failure(classify(error))
}

fn row_to_link(row: LinkRow) -> Link {
    Link {
        id: row.id,
        name: row.name,
        url: row.url,
        notes: row.notes,
        position: row.position,
    }
}

fn link_to_row(link: &Link) -> LinkRow {
    LinkRow {
        id: link.id,
        name: link.name.clone(),
        url: link.url.clone(),
        notes: link.notes.clone(),
        position: link.position,
    }
}

#[async_trait]
impl LinkRepository for DieselLinkRepository {
    async fn list(&self) -> Result<Vec<Link>, LinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = links::table
            .order(links::position.asc())
            .select(LinkRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_link).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Link>, LinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = links::table
            .find(id)
            .select(LinkRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_link))
    }

    async fn create(&self, draft: LinkDraft) -> Result<Link, LinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    diesel::sql_query("LOCK TABLE links IN EXCLUSIVE MODE")
                        .execute(conn)
                        .await?;
                    let highest: Option<i64> = links::table
                        .select(max(links::position))
                        .first(conn)
                        .await?;
                    let issued: Option<i64> = link_position_counter::table
                        .select(link_position_counter::highest_issued)
                        .first(conn)
                        .await
                        .optional()?;
                    let link = draft.into_link(Uuid::new_v4(), next_position(highest, issued));
                    diesel::insert_into(link_position_counter::table)
                        .values((
                            link_position_counter::singleton.eq(true),
                            link_position_counter::highest_issued.eq(link.position),
                        ))
                        .on_conflict(link_position_counter::singleton)
                        .do_update()
                        .set(link_position_counter::highest_issued.eq(link.position))
                        .execute(conn)
                        .await?;
                    diesel::insert_into(links::table)
                        .values(&link_to_row(&link))
                        .returning(LinkRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_link(row))
    }

    async fn update(&self, link: &Link) -> Result<bool, LinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let updated = diesel::update(links::table.find(link.id))
            .set(&link_to_row(link))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, LinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = diesel::delete(links::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn constraint_failures_surface_as_query_errors() {
        assert!(matches!(
            map_failure(StorageFailure::Constraint("links_pkey".to_owned())),
            LinkRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn rows_convert_field_for_field() {
        let link = LinkDraft::try_new("Rail", "https://rail.example", Some("passes"))
            .expect("draft")
            .into_link(Uuid::new_v4(), 7);
        assert_eq!(row_to_link(link_to_row(&link)), link);
    }
}
