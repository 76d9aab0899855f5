//! A JSON array persisted as one file.
//!
//! Each collection owns a capability handle on its data directory. Reads and
//! read-modify-write cycles are serialised by an async mutex so concurrent
//! requests in one process never lose each other's updates. Writes are staged
//! next to the target and renamed over it, so readers only ever observe a
//! complete document.

use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Errors raised while loading or saving a JSON collection.
#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("data file {path} does not exist")]
    Missing { path: PathBuf },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("data file {path} is not a JSON array of records: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl JsonStoreError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// How a collection treats a data file that is not there yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingFile {
    /// Refuse to open.
    Fail,
    /// Create the directory and an empty `[]` document.
    Initialise,
}

/// A file-backed list of records.
pub struct JsonCollection<T> {
    dir: Dir,
    file_name: String,
    path: PathBuf,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open `data_dir/file_name`, validating that it parses.
    ///
    /// # Errors
    /// Returns [`JsonStoreError::Missing`] when the file is absent and
    /// `missing` is [`MissingFile::Fail`], and [`JsonStoreError::Malformed`]
    /// when the document is not an array of `T`.
    pub fn open(
        data_dir: &Path,
        file_name: &str,
        missing: MissingFile,
    ) -> Result<Self, JsonStoreError> {
        let path = data_dir.join(file_name);
        if missing == MissingFile::Initialise {
            Dir::create_ambient_dir_all(data_dir, ambient_authority())
                .map_err(|error| JsonStoreError::io(data_dir, error))?;
        }
        let dir = match Dir::open_ambient_dir(data_dir, ambient_authority()) {
            Ok(dir) => dir,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(JsonStoreError::Missing { path });
            }
            Err(error) => return Err(JsonStoreError::io(data_dir, error)),
        };

        let collection = Self {
            dir,
            file_name: file_name.to_owned(),
            path,
            lock: Mutex::new(()),
            _records: PhantomData,
        };

        if !collection.exists()? {
            match missing {
                MissingFile::Fail => {
                    return Err(JsonStoreError::Missing {
                        path: collection.path,
                    });
                }
                MissingFile::Initialise => {
                    collection.save(&[])?;
                    info!(path = %collection.path.display(), "initialised empty data file");
                }
            }
        }

        let records = collection.load()?;
        debug!(
            path = %collection.path.display(),
            records = records.len(),
            "opened JSON collection"
        );
        Ok(collection)
    }

    /// Location of the backing file, for diagnostics.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of every record.
    pub async fn read(&self) -> Result<Vec<T>, JsonStoreError> {
        let _guard = self.lock.lock().await;
        self.load()
    }

    /// Run `change` against the current records and persist the result.
    ///
    /// The lock is held from load to rename. When `change` returns `Err` the
    /// file is left untouched and the error is handed back unchanged.
    pub async fn modify<R, E>(
        &self,
        change: impl FnOnce(&mut Vec<T>) -> Result<R, E>,
    ) -> Result<Result<R, E>, JsonStoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load()?;
        let outcome = change(&mut records);
        if outcome.is_ok() {
            self.save(&records)?;
        }
        Ok(outcome)
    }

    fn exists(&self) -> Result<bool, JsonStoreError> {
        match self.dir.metadata(&self.file_name) {
            Ok(_) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(JsonStoreError::io(&self.path, error)),
        }
    }

    fn load(&self) -> Result<Vec<T>, JsonStoreError> {
        let bytes = match self.dir.read(&self.file_name) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(JsonStoreError::Missing {
                    path: self.path.clone(),
                });
            }
            Err(error) => return Err(JsonStoreError::io(&self.path, error)),
        };
        serde_json::from_slice(&bytes).map_err(|source| JsonStoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, records: &[T]) -> Result<(), JsonStoreError> {
        let mut body = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(b"    "));
        records
            .serialize(&mut serializer)
            .map_err(|error| JsonStoreError::io(&self.path, io::Error::other(error)))?;

        let staged = format!(".{}.{}.tmp", self.file_name, Uuid::new_v4().simple());
        let result = self
            .dir
            .write(&staged, &body)
            .and_then(|()| self.dir.rename(&staged, &self.dir, &self.file_name));
        if let Err(error) = result {
            let _cleanup = self.dir.remove_file(&staged);
            return Err(JsonStoreError::io(&self.path, error));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Entry {
        name: String,
    }

    fn entry(name: &str) -> Entry {
        Entry {
            name: name.to_owned(),
        }
    }

    #[fixture]
    fn data_dir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[rstest]
    fn missing_file_is_fatal_without_initialisation(data_dir: TempDir) {
        let error = JsonCollection::<Entry>::open(data_dir.path(), "entries.json", MissingFile::Fail)
            .err()
            .expect("missing file");
        assert!(matches!(error, JsonStoreError::Missing { .. }));
    }

    #[rstest]
    fn initialisation_creates_empty_array(data_dir: TempDir) {
        let nested = data_dir.path().join("instance");
        JsonCollection::<Entry>::open(&nested, "entries.json", MissingFile::Initialise)
            .expect("initialised");
        let body = std::fs::read_to_string(nested.join("entries.json")).expect("file written");
        assert_eq!(body, "[]");
    }

    #[rstest]
    fn malformed_file_is_fatal(data_dir: TempDir) {
        std::fs::write(data_dir.path().join("entries.json"), "{not json").expect("write");
        let error =
            JsonCollection::<Entry>::open(data_dir.path(), "entries.json", MissingFile::Initialise)
                .err()
                .expect("malformed");
        assert!(matches!(error, JsonStoreError::Malformed { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn modify_persists_with_four_space_indent(data_dir: TempDir) {
        let store =
            JsonCollection::<Entry>::open(data_dir.path(), "entries.json", MissingFile::Initialise)
                .expect("store");
        store
            .modify(|records| {
                records.push(entry("Peru"));
                Ok::<_, ()>(())
            })
            .await
            .expect("io")
            .expect("change applied");

        let body = std::fs::read_to_string(store.path()).expect("read back");
        assert_eq!(body, "[\n    {\n        \"name\": \"Peru\"\n    }\n]");
        assert_eq!(store.read().await.expect("read"), vec![entry("Peru")]);
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_change_leaves_file_untouched(data_dir: TempDir) {
        let store =
            JsonCollection::<Entry>::open(data_dir.path(), "entries.json", MissingFile::Initialise)
                .expect("store");
        let outcome = store
            .modify(|records| {
                records.push(entry("Chile"));
                Err::<(), _>("duplicate")
            })
            .await
            .expect("io");

        assert_eq!(outcome, Err("duplicate"));
        assert!(store.read().await.expect("read").is_empty());
        let leftovers: Vec<_> = std::fs::read_dir(data_dir.path())
            .expect("list dir")
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_modifications_are_not_lost(data_dir: TempDir) {
        let store = std::sync::Arc::new(
            JsonCollection::<Entry>::open(data_dir.path(), "entries.json", MissingFile::Initialise)
                .expect("store"),
        );
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .modify(|records| {
                            records.push(entry(&format!("place-{i}")));
                            Ok::<_, ()>(())
                        })
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.expect("join").expect("io").expect("applied");
        }
        assert_eq!(store.read().await.expect("read").len(), 16);
    }
}
