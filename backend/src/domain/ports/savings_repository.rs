//! Driven port for savings snapshots.

use async_trait::async_trait;

use crate::domain::finance::{Savings, SavingsBalance};

use super::define_port_error;

define_port_error! {
    /// Errors raised by savings repository adapters.
    pub enum SavingsRepositoryError {
        /// Database connection could not be established.
        Connection { message: String } =>
            "savings repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "savings repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavingsRepository: Send + Sync {
    /// All snapshots, newest first.
    async fn list(&self) -> Result<Vec<Savings>, SavingsRepositoryError>;

    async fn find(&self, id: i32) -> Result<Option<Savings>, SavingsRepositoryError>;

    /// Most recently created snapshot.
    async fn latest(&self) -> Result<Option<Savings>, SavingsRepositoryError>;

    /// Insert a snapshot; storage assigns `id` and `created_at`.
    async fn create(&self, balance: SavingsBalance) -> Result<Savings, SavingsRepositoryError>;

    /// Overwrite the balance; `None` when the id is unknown.
    async fn update(
        &self,
        id: i32,
        balance: SavingsBalance,
    ) -> Result<Option<Savings>, SavingsRepositoryError>;

    /// Returns `false` when the id is unknown.
    async fn delete(&self, id: i32) -> Result<bool, SavingsRepositoryError>;
}

/// Fixture implementation for deployments without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSavingsRepository;

impl FixtureSavingsRepository {
    fn unavailable() -> SavingsRepositoryError {
        SavingsRepositoryError::connection("no database configured")
    }
}

#[async_trait]
impl SavingsRepository for FixtureSavingsRepository {
    async fn list(&self) -> Result<Vec<Savings>, SavingsRepositoryError> {
        Err(Self::unavailable())
    }

    async fn find(&self, _id: i32) -> Result<Option<Savings>, SavingsRepositoryError> {
        Err(Self::unavailable())
    }

    async fn latest(&self) -> Result<Option<Savings>, SavingsRepositoryError> {
        Err(Self::unavailable())
    }

    async fn create(&self, _balance: SavingsBalance) -> Result<Savings, SavingsRepositoryError> {
        Err(Self::unavailable())
    }

    async fn update(
        &self,
        _id: i32,
        _balance: SavingsBalance,
    ) -> Result<Option<Savings>, SavingsRepositoryError> {
        Err(Self::unavailable())
    }

    async fn delete(&self, _id: i32) -> Result<bool, SavingsRepositoryError> {
        Err(Self::unavailable())
    }
}
