//! `VisitedRepository` over a JSON file (`visited.json`).

use std::path::Path;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{VisitedRepository, VisitedRepositoryError};
use crate::domain::{VisitedPlace, WhichMap};

use super::collection::{JsonCollection, JsonStoreError, MissingFile};

/// File name of the visited places document inside the data directory.
pub const VISITED_FILE: &str = "visited.json";

/// File-backed visited places.
pub struct JsonVisitedRepository {
    places: JsonCollection<VisitedPlace>,
}

impl JsonVisitedRepository {
    /// Open `data_dir/visited.json`.
    ///
    /// # Errors
    /// Fails when the file is missing (unless `missing` initialises it) or
    /// does not parse.
    pub fn open(data_dir: &Path, missing: MissingFile) -> Result<Self, JsonStoreError> {
        Ok(Self {
            places: JsonCollection::open(data_dir, VISITED_FILE, missing)?,
        })
    }
}

fn map_store_error(error: JsonStoreError) -> VisitedRepositoryError {
    match error {
        JsonStoreError::Missing { .. } | JsonStoreError::Io { .. } => {
            VisitedRepositoryError::connection(error.to_string())
        }
        JsonStoreError::Malformed { .. } => VisitedRepositoryError::query(error.to_string()),
    }
}

fn duplicate(place: &VisitedPlace) -> VisitedRepositoryError {
    VisitedRepositoryError::constraint(format!(
        "'{}' already exists on the {} map",
        place.name, place.which_map
    ))
}

fn collides(records: &[VisitedPlace], place: &VisitedPlace) -> bool {
    records
        .iter()
        .any(|other| other.id != place.id && other.has_natural_key(place.which_map, &place.name))
}

#[async_trait]
impl VisitedRepository for JsonVisitedRepository {
    async fn list(&self, which_map: WhichMap) -> Result<Vec<VisitedPlace>, VisitedRepositoryError> {
        let records = self.places.read().await.map_err(map_store_error)?;
        Ok(records
            .into_iter()
            .filter(|place| place.which_map == which_map)
            .collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<VisitedPlace>, VisitedRepositoryError> {
        let records = self.places.read().await.map_err(map_store_error)?;
        Ok(records.into_iter().find(|place| place.id == id))
    }

    async fn find_by_name(
        &self,
        which_map: WhichMap,
        name: &str,
    ) -> Result<Option<VisitedPlace>, VisitedRepositoryError> {
        let records = self.places.read().await.map_err(map_store_error)?;
        Ok(records
            .into_iter()
            .find(|place| place.has_natural_key(which_map, name)))
    }

    async fn insert(&self, place: &VisitedPlace) -> Result<(), VisitedRepositoryError> {
        self.places
            .modify(|records| {
                if collides(records, place) {
                    return Err(duplicate(place));
                }
                records.push(place.clone());
                Ok(())
            })
            .await
            .map_err(map_store_error)?
    }

    async fn update(&self, place: &VisitedPlace) -> Result<bool, VisitedRepositoryError> {
        self.places
            .modify(|records| {
                if collides(records, place) {
                    return Err(duplicate(place));
                }
                match records.iter_mut().find(|stored| stored.id == place.id) {
                    Some(stored) => {
                        *stored = place.clone();
                        Ok(true)
                    }
                    None => Ok(false),
                }
            })
            .await
            .map_err(map_store_error)?
    }

    async fn delete(&self, id: Uuid) -> Result<bool, VisitedRepositoryError> {
        self.places
            .modify(|records| {
                let before = records.len();
                records.retain(|place| place.id != id);
                Ok(records.len() != before)
            })
            .await
            .map_err(map_store_error)?
    }
}
