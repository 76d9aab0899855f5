//! `FinanceSeedSource` reading a JSON document such as `instance/finances.json`.
//!
//! The file is read on every reload so edits take effect without a restart.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};

use crate::domain::finance::FinanceSeed;
use crate::domain::ports::{FinanceSeedSource, FinanceSeedSourceError};

/// Finance seed loaded from a file path.
#[derive(Debug, Clone)]
pub struct JsonFinanceSeedSource {
    path: PathBuf,
}

impl JsonFinanceSeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "seed path has no file name"))?;
        Dir::open_ambient_dir(parent, ambient_authority())?.read(file_name)
    }
}

#[async_trait]
impl FinanceSeedSource for JsonFinanceSeedSource {
    async fn load(&self) -> Result<FinanceSeed, FinanceSeedSourceError> {
        let bytes = self.read_bytes().map_err(|error| {
            FinanceSeedSourceError::unavailable(format!("{}: {error}", self.path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|error| {
            FinanceSeedSourceError::malformed(format!("{}: {error}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn loads_mortgage_section() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("finances.json");
        std::fs::write(
            &path,
            r#"{"mortgage": {"principal": 320000, "interest_rate": 0.055,
                "start_date": "2021-08-01", "loan_term": 360}}"#,
        )
        .expect("write seed");

        let seed = JsonFinanceSeedSource::new(&path).load().await.expect("seed");
        assert_eq!(seed.mortgage.principal, 320_000.0);
        assert_eq!(seed.mortgage.monthly_escrow, 0.0);
        assert_eq!(
            seed.mortgage.start_date,
            NaiveDate::from_ymd_opt(2021, 8, 1).expect("date")
        );
    }

    #[rstest]
    #[case(None, "unavailable")]
    #[case(Some(r#"{"savings": []}"#), "malformed")]
    #[tokio::test]
    async fn reports_missing_and_invalid_files(
        #[case] contents: Option<&str>,
        #[case] expected: &str,
    ) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("finances.json");
        if let Some(body) = contents {
            std::fs::write(&path, body).expect("write seed");
        }

        let error = JsonFinanceSeedSource::new(&path)
            .load()
            .await
            .expect_err("seed failure");
        let kind = match error {
            FinanceSeedSourceError::Unavailable { .. } => "unavailable",
            FinanceSeedSourceError::Malformed { .. } => "malformed",
        };
        assert_eq!(kind, expected);
    }
}
