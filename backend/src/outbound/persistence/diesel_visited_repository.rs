//! PostgreSQL-backed `VisitedRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{VisitedRepository, VisitedRepositoryError};
use crate::domain::{VisitedPlace, WhichMap};

use super::diesel_error_mapping::{StorageFailure, classify};
use super::models::VisitedPlaceRow;
use super::pool::DbPool;
use super::schema::visited_places;

diesel::define_sql_function! {
    /// SQL `lower(text)`, matching the `(lower(name), which_map)` unique index.
    fn lower(value: Text) -> Text;
}

/// Diesel implementation of the visited places port.
#[derive(Clone)]
pub struct DieselVisitedRepository {
    pool: DbPool,
}

impl DieselVisitedRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StorageFailure>) -> VisitedRepositoryError {
    match failure.into() {
        StorageFailure::Connection(message) => VisitedRepositoryError::connection(message),
        StorageFailure::Constraint(message) => VisitedRepositoryError::constraint(message),
        StorageFailure::Query(message) => VisitedRepositoryError::query(message),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> VisitedRepositoryError {
    map_failure(classify(error))
}

fn row_to_place(row: VisitedPlaceRow) -> Result<VisitedPlace, VisitedRepositoryError> {
    let which_map = row
        .which_map
        .parse::<WhichMap>()
        .map_err(|err| VisitedRepositoryError::query(format!("row {}: {err}", row.id)))?;
    Ok(VisitedPlace {
        id: row.id,
        name: row.name,
        which_map,
        john: row.john,
        marcia: row.marcia,
        todo: row.todo,
    })
}

fn place_to_row(place: &VisitedPlace) -> VisitedPlaceRow {
    VisitedPlaceRow {
        id: place.id,
        name: place.name.clone(),
        which_map: place.which_map.as_str().to_owned(),
        john: place.john,
        marcia: place.marcia,
        todo: place.todo,
    }
}

#[async_trait]
impl VisitedRepository for DieselVisitedRepository {
    async fn list(&self, which_map: WhichMap) -> Result<Vec<VisitedPlace>, VisitedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        visited_places::table
            .filter(visited_places::which_map.eq(which_map.as_str()))
            .order(visited_places::name.asc())
            .select(VisitedPlaceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_place)
            .collect()
    }

    async fn find(&self, id: Uuid) -> Result<Option<VisitedPlace>, VisitedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        visited_places::table
            .find(id)
            .select(VisitedPlaceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_place)
            .transpose()
    }

    async fn find_by_name(
        &self,
        which_map: WhichMap,
        name: &str,
    ) -> Result<Option<VisitedPlace>, VisitedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        visited_places::table
            .filter(visited_places::which_map.eq(which_map.as_str()))
            .filter(lower(visited_places::name).eq(name.to_lowercase()))
            .select(VisitedPlaceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_place)
            .transpose()
    }

    async fn insert(&self, place: &VisitedPlace) -> Result<(), VisitedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::insert_into(visited_places::table)
            .values(&place_to_row(place))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, place: &VisitedPlace) -> Result<bool, VisitedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let updated = diesel::update(visited_places::table.find(place.id))
            .set(&place_to_row(place))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, VisitedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = diesel::delete(visited_places::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
