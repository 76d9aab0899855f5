//! PostgreSQL-backed `MortgageRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::finance::{Mortgage, MortgageDraft, MortgagePatch};
use crate::domain::ports::{MortgageRepository, MortgageRepositoryError};

use super::diesel_error_mapping::{StorageFailure, classify};
use super::models::{MortgageChanges, MortgageRow, NewMortgageRow};
use super::pool::DbPool;
use super::schema::mortgages;

/// Diesel implementation of the mortgage port.
#[derive(Clone)]
pub struct DieselMortgageRepository {
    pool: DbPool,
}

impl DieselMortgageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<StorageFailure>) -> MortgageRepositoryError {
    match failure.into() {
        StorageFailure::Connection(message) => MortgageRepositoryError::connection(message),
        StorageFailure::Constraint(message) => MortgageRepositoryError::constraint(message),
        StorageFailure::Query(message) => MortgageRepositoryError::query(message),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> MortgageRepositoryError {
    map_failure(classify(error))
}

fn row_to_mortgage(row: MortgageRow) -> Mortgage {
    Mortgage {
        id: row.id,
        principal: row.principal,
        interest_rate: row.interest_rate,
        start_date: row.start_date,
        loan_term: row.loan_term,
        monthly_escrow: row.monthly_escrow,
    }
}

fn new_row(draft: &MortgageDraft) -> NewMortgageRow {
    NewMortgageRow {
        principal: draft.principal(),
        interest_rate: draft.interest_rate(),
        start_date: draft.start_date(),
        loan_term: draft.loan_term(),
        monthly_escrow: draft.monthly_escrow(),
    }
}

fn changes(patch: &MortgagePatch) -> MortgageChanges {
    MortgageChanges {
        principal: patch.principal,
        interest_rate: patch.interest_rate,
        start_date: patch.start_date,
        loan_term: patch.loan_term,
        monthly_escrow: patch.monthly_escrow,
    }
}

fn is_empty(patch: &MortgagePatch) -> bool {
    patch.principal.is_none()
        && patch.interest_rate.is_none()
        && patch.start_date.is_none()
        && patch.loan_term.is_none()
        && patch.monthly_escrow.is_none()
}

#[async_trait]
impl MortgageRepository for DieselMortgageRepository {
    async fn list(&self) -> Result<Vec<Mortgage>, MortgageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows = mortgages::table
            .order(mortgages::id.asc())
            .select(MortgageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_mortgage).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Mortgage>, MortgageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = mortgages::table
            .find(id)
            .select(MortgageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_mortgage))
    }

    async fn create(&self, draft: MortgageDraft) -> Result<Mortgage, MortgageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = diesel::insert_into(mortgages::table)
            .values(&new_row(&draft))
            .returning(MortgageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_mortgage(row))
    }

    async fn update(
        &self,
        id: i32,
        patch: MortgagePatch,
    ) -> Result<Option<Mortgage>, MortgageRepositoryError> {
        // Diesel rejects an empty changeset, so a no-op patch is a plain read.
        if is_empty(&patch) {
            return self.find(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = diesel::update(mortgages::table.find(id))
            .set(&changes(&patch))
            .returning(MortgageRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_mortgage))
    }

    async fn delete(&self, id: i32) -> Result<bool, MortgageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let deleted = diesel::delete(mortgages::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn replace_all(&self, draft: MortgageDraft) -> Result<Mortgage, MortgageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(mortgages::table).execute(conn).await?;
                    diesel::insert_into(mortgages::table)
                        .values(&new_row(&draft))
                        .returning(MortgageRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_mortgage(row))
    }
}
