//! Driven port for mortgage persistence.

use async_trait::async_trait;

use crate::domain::finance::{Mortgage, MortgageDraft, MortgagePatch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mortgage repository adapters.
    pub enum MortgageRepositoryError {
        /// Database connection could not be established.
        Connection { message: String } =>
            "mortgage repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "mortgage repository query failed: {message}",
        /// Row rejected by a check constraint.
        Constraint { message: String } =>
            "mortgage repository constraint violated: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MortgageRepository: Send + Sync {
    /// All mortgages ordered by id.
    async fn list(&self) -> Result<Vec<Mortgage>, MortgageRepositoryError>;

    async fn find(&self, id: i32) -> Result<Option<Mortgage>, MortgageRepositoryError>;

    /// Insert and return the stored row.
    async fn create(&self, draft: MortgageDraft) -> Result<Mortgage, MortgageRepositoryError>;

    /// Apply a validated patch; `None` when the id is unknown.
    async fn update(
        &self,
        id: i32,
        patch: MortgagePatch,
    ) -> Result<Option<Mortgage>, MortgageRepositoryError>;

    /// Returns `false` when the id is unknown.
    async fn delete(&self, id: i32) -> Result<bool, MortgageRepositoryError>;

    /// Delete every mortgage and insert `draft` in one transaction.
    async fn replace_all(&self, draft: MortgageDraft) -> Result<Mortgage, MortgageRepositoryError>;
}

/// Fixture implementation for deployments without a database.
///
/// Every call reports a connection failure so finance endpoints answer
/// `503 Service Unavailable` instead of pretending to store data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMortgageRepository;

impl FixtureMortgageRepository {
    fn unavailable() -> MortgageRepositoryError {
        MortgageRepositoryError::connection("no database configured")
    }
}

#[async_trait]
impl MortgageRepository for FixtureMortgageRepository {
    async fn list(&self) -> Result<Vec<Mortgage>, MortgageRepositoryError> {
        Err(Self::unavailable())
    }

    async fn find(&self, _id: i32) -> Result<Option<Mortgage>, MortgageRepositoryError> {
        Err(Self::unavailable())
    }

    async fn create(&self, _draft: MortgageDraft) -> Result<Mortgage, MortgageRepositoryError> {
        Err(Self::unavailable())
    }

    async fn update(
        &self,
        _id: i32,
        _patch: MortgagePatch,
    ) -> Result<Option<Mortgage>, MortgageRepositoryError> {
        Err(Self::unavailable())
    }

    async fn delete(&self, _id: i32) -> Result<bool, MortgageRepositoryError> {
        Err(Self::unavailable())
    }

    async fn replace_all(&self, _draft: MortgageDraft) -> Result<Mortgage, MortgageRepositoryError> {
        Err(Self::unavailable())
    }
}
