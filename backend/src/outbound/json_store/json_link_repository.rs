//! `LinkRepository` over a JSON file (`links.json`).
//!
//! The highest position ever issued is kept in `link_positions.json` so that
//! deleting the last link does not free its position for reuse.

use std::convert::Infallible;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::ports::{LinkRepository, LinkRepositoryError};
use crate::domain::{Link, LinkDraft, next_position};

use super::collection::{JsonCollection, JsonStoreError, MissingFile};

/// File name of the links document inside the data directory.
pub const LINKS_FILE: &str = "links.json";

/// File name of the issued-position record inside the data directory.
pub const LINK_POSITIONS_FILE: &str = "link_positions.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PositionMark {
    highest_issued: i64,
}

/// File-backed travel links.
pub struct JsonLinkRepository {
    links: JsonCollection<Link>,
    marks: JsonCollection<PositionMark>,
    creating: Mutex<()>,
}

impl JsonLinkRepository {
    /// Open `data_dir/links.json`.
    ///
    /// # Errors
    /// Fails when the file is missing (unless `missing` initialises it) or
    /// does not parse. The issued-position record is always initialised.
    pub fn open(data_dir: &Path, missing: MissingFile) -> Result<Self, JsonStoreError> {
        let links = JsonCollection::open(data_dir, LINKS_FILE, missing)?;
        Ok(Self {
            links,
            marks: JsonCollection::open(data_dir, LINK_POSITIONS_FILE, MissingFile::Initialise)?,
            creating: Mutex::new(()),
        })
    }

    async fn highest_issued(&self) -> Result<Option<i64>, JsonStoreError> {
        let marks = self.marks.read().await?;
        Ok(marks.iter().map(|mark| mark.highest_issued).max())
    }

    async fn record_issued(&self, position: i64) -> Result<(), JsonStoreError> {
        self.marks
            .modify(|marks| {
                *marks = vec![PositionMark {
                    highest_issued: position,
                }];
                Ok::<_, Infallible>(())
            })
            .await
            .map(|_| ())
    }
}

fn map_store_error(error: JsonStoreError) -> LinkRepositoryError {
    match error {
        JsonStoreError::Missing { .. } | JsonStoreError::Io { .. } => {
            LinkRepositoryError::connection(error.to_string())
        }
        JsonStoreError::Malformed { .. } => LinkRepositoryError::query(error.to_string()),
    }
}

#[async_trait]
impl LinkRepository for JsonLinkRepository {
    async fn list(&self) -> Result<Vec<Link>, LinkRepositoryError> {
        let mut links = self.links.read().await.map_err(map_store_error)?;
        links.sort_by_key(|link| link.position);
        Ok(links)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Link>, LinkRepositoryError> {
        let links = self.links.read().await.map_err(map_store_error)?;
        Ok(links.into_iter().find(|link| link.id == id))
    }

    async fn create(&self, draft: LinkDraft) -> Result<Link, LinkRepositoryError> {
        let _guard = self.creating.lock().await;
        let issued = self.highest_issued().await.map_err(map_store_error)?;
        let stored = self.links.read().await.map_err(map_store_error)?;
        let link = draft.into_link(
            Uuid::new_v4(),
            next_position(stored.iter().map(|link| link.position), issued),
        );

        // The mark is written first so a failed insert leaves a gap, never a reuse.
        self.record_issued(link.position)
            .await
            .map_err(map_store_error)?;
        self.links
            .modify(|links| {
                links.push(link.clone());
                Ok(link)
            })
            .await
            .map_err(map_store_error)?
    }

    async fn update(&self, link: &Link) -> Result<bool, LinkRepositoryError> {
        self.links
            .modify(|links| {
                Ok(match links.iter_mut().find(|stored| stored.id == link.id) {
                    Some(stored) => {
                        *stored = link.clone();
                        true
                    }
                    None => false,
                })
            })
            .await
            .map_err(map_store_error)?
    }

    async fn delete(&self, id: Uuid) -> Result<bool, LinkRepositoryError> {
        self.links
            .modify(|links| {
                let before = links.len();
                links.retain(|link| link.id != id);
                Ok(links.len() != before)
            })
            .await
            .map_err(map_store_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft(name: &str) -> LinkDraft {
        LinkDraft::try_new(name, "https://example.com", None).expect("valid draft")
    }

    #[rstest]
    #[tokio::test]
    async fn positions_are_never_reissued_after_delete() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = JsonLinkRepository::open(dir.path(), MissingFile::Initialise).expect("repo");

        let first = repo.create(draft("Flights")).await.expect("create");
        let second = repo.create(draft("Hotels")).await.expect("create");
        assert_eq!((first.position, second.position), (1, 2));

        assert!(repo.delete(first.id).await.expect("delete"));
        let third = repo.create(draft("Trains")).await.expect("create");
        assert_eq!(third.position, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_the_last_link_does_not_free_its_position() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = JsonLinkRepository::open(dir.path(), MissingFile::Initialise).expect("repo");

        repo.create(draft("Flights")).await.expect("create");
        let top = repo.create(draft("Hotels")).await.expect("create");
        assert!(repo.delete(top.id).await.expect("delete"));

        let next = repo.create(draft("Trains")).await.expect("create");
        assert_eq!(next.position, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn issued_positions_survive_reopening() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let repo = JsonLinkRepository::open(dir.path(), MissingFile::Initialise).expect("repo");
            let only = repo.create(draft("Flights")).await.expect("create");
            assert!(repo.delete(only.id).await.expect("delete"));
        }

        let repo = JsonLinkRepository::open(dir.path(), MissingFile::Fail).expect("reopen");
        assert!(repo.list().await.expect("list").is_empty());
        assert_eq!(repo.create(draft("Hotels")).await.expect("create").position, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_creates_get_distinct_positions() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = std::sync::Arc::new(
            JsonLinkRepository::open(dir.path(), MissingFile::Initialise).expect("repo"),
        );
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(draft(&format!("link-{i}"))).await })
            })
            .collect();
        let mut positions = Vec::new();
        for task in tasks {
            positions.push(task.await.expect("join").expect("create").position);
        }
        positions.sort_unstable();
        assert_eq!(positions, (1..=8).collect::<Vec<i64>>());
    }

    #[rstest]
    #[tokio::test]
    async fn list_returns_links_by_position() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = JsonLinkRepository::open(dir.path(), MissingFile::Initialise).expect("repo");
        let mut first = repo.create(draft("Maps")).await.expect("create");
        repo.create(draft("Visas")).await.expect("create");
        first.position = 10;
        assert!(repo.update(&first).await.expect("update"));

        let names: Vec<_> = repo
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|link| link.name)
            .collect();
        assert_eq!(names, ["Visas", "Maps"]);
    }

    #[rstest]
    #[tokio::test]
    async fn existing_file_is_loaded_with_default_notes() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(LINKS_FILE),
            r#"[{"id": "6f1c1c1e-0000-4000-8000-000000000001", "name": "Rail", "url": "https://rail.example", "position": 4}]"#,
        )
        .expect("seed file");
        let repo = JsonLinkRepository::open(dir.path(), MissingFile::Fail).expect("repo");

        let links = repo.list().await.expect("list");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].notes, "");
        assert_eq!(repo.create(draft("Ferries")).await.expect("create").position, 5);
    }
}
