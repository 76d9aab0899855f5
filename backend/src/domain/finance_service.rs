//! Finance domain service.
//!
//! One service implements every finance driving port. Repositories are
//! generic so tests can substitute mocks; the clock is injected because RSU
//! schedules and countdowns depend on the current month.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::info;

use crate::domain::Error;
use crate::domain::finance::{
    BonusPayment, BonusPaymentDraft, BonusType, DaysLeft, Mortgage, MortgageDraft, MortgagePatch,
    Payout, Savings, SavingsBalance, YearMonth, aggregate_payouts, days_left,
};
use crate::domain::ports::{
    BonusLedger, BonusPaymentRepository, BonusPaymentRepositoryError, Countdown,
    FinanceSeedSource, FinanceSeedSourceError, MortgageLedger, MortgageRepository,
    MortgageRepositoryError, MortgageSummary, SavingsLedger, SavingsRepository,
    SavingsRepositoryError,
};

/// Parameter object bundling the finance repositories.
pub struct FinanceRepositories<M, B, S> {
    pub mortgages: Arc<M>,
    pub bonuses: Arc<B>,
    pub savings: Arc<S>,
}

/// Finance service over mortgage, bonus and savings repositories.
pub struct FinanceService<M, B, S> {
    mortgages: Arc<M>,
    bonuses: Arc<B>,
    savings: Arc<S>,
    seed: Arc<dyn FinanceSeedSource>,
    clock: Arc<dyn Clock>,
}

impl<M, B, S> FinanceService<M, B, S> {
    pub fn new(
        repositories: FinanceRepositories<M, B, S>,
        seed: Arc<dyn FinanceSeedSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            mortgages: repositories.mortgages,
            bonuses: repositories.bonuses,
            savings: repositories.savings,
            seed,
            clock,
        }
    }

    fn current_month(&self) -> YearMonth {
        YearMonth::of(self.clock.local().date_naive())
    }
}

fn map_mortgage_error(error: MortgageRepositoryError) -> Error {
    match error {
        MortgageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("mortgage repository unavailable: {message}"))
        }
        MortgageRepositoryError::Query { message } => {
            Error::internal(format!("mortgage repository error: {message}"))
        }
        MortgageRepositoryError::Constraint { message } => {
            Error::invalid_request(format!("Error creating mortgage: {message}"))
        }
    }
}

fn map_bonus_error(error: BonusPaymentRepositoryError) -> Error {
    match error {
        BonusPaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bonus repository unavailable: {message}"))
        }
        BonusPaymentRepositoryError::Query { message } => {
            Error::internal(format!("bonus repository error: {message}"))
        }
    }
}

fn map_savings_error(error: SavingsRepositoryError) -> Error {
    match error {
        SavingsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("savings repository unavailable: {message}"))
        }
        SavingsRepositoryError::Query { message } => {
            Error::internal(format!("savings repository error: {message}"))
        }
    }
}

fn map_seed_error(error: FinanceSeedSourceError) -> Error {
    match error {
        FinanceSeedSourceError::Unavailable { message } => {
            Error::service_unavailable(format!("finance seed unavailable: {message}"))
        }
        FinanceSeedSourceError::Malformed { message } => {
            Error::internal(format!("finance seed malformed: {message}"))
        }
    }
}

fn mortgage_not_found() -> Error {
    Error::not_found("Mortgage details not found.")
}

fn savings_not_found() -> Error {
    Error::not_found("Savings record not found.")
}

fn summarise(mortgage: Mortgage) -> Result<MortgageSummary, Error> {
    let monthly_payment = mortgage
        .monthly_payment()
        .map_err(|err| Error::internal(format!("stored mortgage {} is invalid: {err}", mortgage.id)))?;
    Ok(MortgageSummary {
        monthly_total: monthly_payment + mortgage.monthly_escrow,
        monthly_payment,
        mortgage,
    })
}

#[async_trait]
impl<M, B, S> MortgageLedger for FinanceService<M, B, S>
where
    M: MortgageRepository,
    B: BonusPaymentRepository,
    S: SavingsRepository,
{
    async fn list_mortgages(&self) -> Result<Vec<MortgageSummary>, Error> {
        self.mortgages
            .list()
            .await
            .map_err(map_mortgage_error)?
            .into_iter()
            .map(summarise)
            .collect()
    }

    async fn get_mortgage(&self, id: i32) -> Result<MortgageSummary, Error> {
        let mortgage = self
            .mortgages
            .find(id)
            .await
            .map_err(map_mortgage_error)?
            .ok_or_else(mortgage_not_found)?;
        summarise(mortgage)
    }

    async fn create_mortgage(&self, draft: MortgageDraft) -> Result<MortgageSummary, Error> {
        let mortgage = self
            .mortgages
            .create(draft)
            .await
            .map_err(map_mortgage_error)?;
        summarise(mortgage)
    }

    async fn update_mortgage(
        &self,
        id: i32,
        patch: MortgagePatch,
    ) -> Result<MortgageSummary, Error> {
        let mortgage = self
            .mortgages
            .update(id, patch)
            .await
            .map_err(map_mortgage_error)?
            .ok_or_else(mortgage_not_found)?;
        summarise(mortgage)
    }

    async fn delete_mortgage(&self, id: i32) -> Result<(), Error> {
        let found = self
            .mortgages
            .delete(id)
            .await
            .map_err(map_mortgage_error)?;
        if found { Ok(()) } else { Err(mortgage_not_found()) }
    }

    async fn reload_mortgages(&self) -> Result<MortgageSummary, Error> {
        let seed = self.seed.load().await.map_err(map_seed_error)?;
        let draft = MortgageDraft::try_from(seed.mortgage)
            .map_err(|err| Error::internal(format!("finance seed mortgage is invalid: {err}")))?;
        let mortgage = self
            .mortgages
            .replace_all(draft)
            .await
            .map_err(map_mortgage_error)?;
        info!(mortgage_id = mortgage.id, "mortgage details reloaded from seed");
        summarise(mortgage)
    }
}

#[async_trait]
impl<M, B, S> BonusLedger for FinanceService<M, B, S>
where
    M: MortgageRepository,
    B: BonusPaymentRepository,
    S: SavingsRepository,
{
    async fn record_bonus(&self, draft: BonusPaymentDraft) -> Result<BonusPayment, Error> {
        self.bonuses.create(draft).await.map_err(map_bonus_error)
    }

    async fn aggregated_rsu_payouts(&self) -> Result<Vec<Payout>, Error> {
        let as_of = self.current_month();
        let grants = self
            .bonuses
            .list_by_type(BonusType::Rsu)
            .await
            .map_err(map_bonus_error)?;
        Ok(aggregate_payouts(
            grants.iter().flat_map(|grant| grant.upcoming_payouts(as_of)),
        ))
    }
}

#[async_trait]
impl<M, B, S> SavingsLedger for FinanceService<M, B, S>
where
    M: MortgageRepository,
    B: BonusPaymentRepository,
    S: SavingsRepository,
{
    async fn list_savings(&self) -> Result<Vec<Savings>, Error> {
        self.savings.list().await.map_err(map_savings_error)
    }

    async fn get_savings(&self, id: i32) -> Result<Savings, Error> {
        self.savings
            .find(id)
            .await
            .map_err(map_savings_error)?
            .ok_or_else(savings_not_found)
    }

    async fn latest_savings(&self) -> Result<Savings, Error> {
        self.savings
            .latest()
            .await
            .map_err(map_savings_error)?
            .ok_or_else(|| Error::not_found("No savings recorded yet."))
    }

    async fn create_savings(&self, balance: SavingsBalance) -> Result<Savings, Error> {
        self.savings.create(balance).await.map_err(map_savings_error)
    }

    async fn update_savings(&self, id: i32, balance: SavingsBalance) -> Result<Savings, Error> {
        self.savings
            .update(id, balance)
            .await
            .map_err(map_savings_error)?
            .ok_or_else(savings_not_found)
    }

    async fn delete_savings(&self, id: i32) -> Result<(), Error> {
        let found = self.savings.delete(id).await.map_err(map_savings_error)?;
        if found { Ok(()) } else { Err(savings_not_found()) }
    }
}

impl<M, B, S> Countdown for FinanceService<M, B, S>
where
    M: Send + Sync,
    B: Send + Sync,
    S: Send + Sync,
{
    fn days_left(&self, end: NaiveDate, excluded: &[NaiveDate]) -> DaysLeft {
        days_left(self.clock.local().date_naive(), end, excluded)
    }
}

#[cfg(test)]
#[path = "finance_service_tests.rs"]
mod tests;
