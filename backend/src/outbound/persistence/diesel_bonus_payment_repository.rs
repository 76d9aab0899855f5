//! PostgreSQL-backed `BonusPaymentRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::finance::{BonusPayment, BonusPaymentDraft, BonusType};
use crate::domain::ports::{BonusPaymentRepository, BonusPaymentRepositoryError};

use super::diesel_error_mapping::{StorageFailure, classify};
use super::models::{BonusPaymentRow, NewBonusPaymentRow};
use super::pool::DbPool;
use super::schema::bonus_payments;

/// Diesel implementation of the bonus payment port.
#[derive(Clone)]
pub struct DieselBonusPaymentRepository {
    pool: DbPool,
}

impl DieselBonusPaymentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StorageFailure>) -> BonusPaymentRepositoryError {
    match failure.into() {
        StorageFailure::Connection(message) => BonusPaymentRepositoryError::connection(message),
        StorageFailure::Constraint(message) | StorageFailure::Query(message) => {
            BonusPaymentRepositoryError::query(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> BonusPaymentRepositoryError {
    map_failure(classify(error))
}

fn row_to_payment(row: BonusPaymentRow) -> Result<BonusPayment, BonusPaymentRepositoryError> {
    let bonus_type = row
        .bonus_type
        .parse::<BonusType>()
        .map_err(|err| BonusPaymentRepositoryError::query(format!("row {}: {err}", row.id)))?;
    Ok(BonusPayment {
        id: row.id,
        bonus_type,
        amount: row.amount,
        payment_date: row.payment_date,
        year_assigned: row.year_assigned,
    })
}

#[async_trait]
impl BonusPaymentRepository for DieselBonusPaymentRepository {
    async fn create(
        &self,
        draft: BonusPaymentDraft,
    ) -> Result<BonusPayment, BonusPaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewBonusPaymentRow {
            bonus_type: draft.bonus_type().as_str(),
            amount: draft.amount(),
            payment_date: draft.payment_date(),
            year_assigned: draft.year_assigned(),
        };
        let stored = diesel::insert_into(bonus_payments::table)
            .values(&row)
            .returning(BonusPaymentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_payment(stored)
    }

    async fn list_by_type(
        &self,
        bonus_type: BonusType,
    ) -> Result<Vec<BonusPayment>, BonusPaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        bonus_payments::table
            .filter(bonus_payments::bonus_type.eq(bonus_type.as_str()))
            .order(bonus_payments::id.asc())
            .select(BonusPaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_payment)
            .collect()
    }
}
