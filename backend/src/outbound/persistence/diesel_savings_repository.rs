//! PostgreSQL-backed `SavingsRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::finance::{Savings, SavingsBalance};
use crate::domain::ports::{SavingsRepository, SavingsRepositoryError};

use super::diesel_error_mapping::{StorageFailure, classify};
use super::models::SavingsRow;
use super::pool::DbPool;
use super::schema::savings;

/// Diesel implementation of the savings port.
#[derive(Clone)]
pub struct DieselSavingsRepository {
    pool: DbPool,
}

impl DieselSavingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StorageFailure>) -> SavingsRepositoryError {
    match failure.into() {
        StorageFailure::Connection(message) => SavingsRepositoryError::connection(message),
        StorageFailure::Constraint(message) | StorageFailure::Query(message) => {
            SavingsRepositoryError::query(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> SavingsRepositoryError {
    map_failure(classify(error))
}

fn row_to_savings(row: SavingsRow) -> Savings {
    Savings {
        id: row.id,
        balance: row.balance,
        created_at: row.created_at,
    }
}

#[async_trait]
impl SavingsRepository for DieselSavingsRepository {
    async fn list(&self) -> Result<Vec<Savings>, SavingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = savings::table
            .order((savings::created_at.desc(), savings::id.desc()))
            .select(SavingsRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_savings).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Savings>, SavingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = savings::table
            .find(id)
            .select(SavingsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_savings))
    }

    async fn latest(&self) -> Result<Option<Savings>, SavingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = savings::table
            .order((savings::created_at.desc(), savings::id.desc()))
            .select(SavingsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_savings))
    }

    async fn create(&self, balance: SavingsBalance) -> Result<Savings, SavingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = diesel::insert_into(savings::table)
            .values(savings::balance.eq(balance.value()))
            .returning(SavingsRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_savings(row))
    }

    async fn update(
        &self,
        id: i32,
        balance: SavingsBalance,
    ) -> Result<Option<Savings>, SavingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = diesel::update(savings::table.find(id))
            .set(savings::balance.eq(balance.value()))
            .returning(SavingsRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_savings))
    }

    async fn delete(&self, id: i32) -> Result<bool, SavingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = diesel::delete(savings::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
