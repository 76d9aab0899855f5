//! Driven port for bonus payment persistence.

use async_trait::async_trait;

use crate::domain::finance::{BonusPayment, BonusPaymentDraft, BonusType};

use super::define_port_error;

define_port_error! {
    /// Errors raised by bonus payment repository adapters.
    pub enum BonusPaymentRepositoryError {
        /// Database connection could not be established.
        Connection { message: String } =>
            "bonus payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "bonus payment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BonusPaymentRepository: Send + Sync {
    /// Insert and return the stored row.
    async fn create(
        &self,
        draft: BonusPaymentDraft,
    ) -> Result<BonusPayment, BonusPaymentRepositoryError>;

    /// Every payment of one kind ordered by id.
    async fn list_by_type(
        &self,
        bonus_type: BonusType,
    ) -> Result<Vec<BonusPayment>, BonusPaymentRepositoryError>;
}

/// Fixture implementation for deployments without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBonusPaymentRepository;

#[async_trait]
impl BonusPaymentRepository for FixtureBonusPaymentRepository {
    async fn create(
        &self,
        _draft: BonusPaymentDraft,
    ) -> Result<BonusPayment, BonusPaymentRepositoryError> {
        Err(BonusPaymentRepositoryError::connection("no database configured"))
    }

    async fn list_by_type(
        &self,
        _bonus_type: BonusType,
    ) -> Result<Vec<BonusPayment>, BonusPaymentRepositoryError> {
        Err(BonusPaymentRepositoryError::connection("no database configured"))
    }
}
