//! Driving ports for the finance use-cases.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::Error;
use crate::domain::finance::{
    BonusPayment, BonusPaymentDraft, DaysLeft, Mortgage, MortgageDraft, MortgagePatch, Payout,
    Savings, SavingsBalance,
};

/// Mortgage together with its derived monthly figures.
#[derive(Debug, Clone, PartialEq)]
pub struct MortgageSummary {
    pub mortgage: Mortgage,
    /// Principal and interest.
    pub monthly_payment: f64,
    /// Payment plus escrow.
    pub monthly_total: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MortgageLedger: Send + Sync {
    async fn list_mortgages(&self) -> Result<Vec<MortgageSummary>, Error>;

    async fn get_mortgage(&self, id: i32) -> Result<MortgageSummary, Error>;

    async fn create_mortgage(&self, draft: MortgageDraft) -> Result<MortgageSummary, Error>;

    async fn update_mortgage(&self, id: i32, patch: MortgagePatch)
    -> Result<MortgageSummary, Error>;

    async fn delete_mortgage(&self, id: i32) -> Result<(), Error>;

    /// Replace every mortgage with the one in the finance seed file.
    async fn reload_mortgages(&self) -> Result<MortgageSummary, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BonusLedger: Send + Sync {
    async fn record_bonus(&self, draft: BonusPaymentDraft) -> Result<BonusPayment, Error>;

    /// Upcoming RSU payouts across all grants, summed per month.
    async fn aggregated_rsu_payouts(&self) -> Result<Vec<Payout>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavingsLedger: Send + Sync {
    async fn list_savings(&self) -> Result<Vec<Savings>, Error>;

    async fn get_savings(&self, id: i32) -> Result<Savings, Error>;

    async fn latest_savings(&self) -> Result<Savings, Error>;

    async fn create_savings(&self, balance: SavingsBalance) -> Result<Savings, Error>;

    async fn update_savings(&self, id: i32, balance: SavingsBalance) -> Result<Savings, Error>;

    async fn delete_savings(&self, id: i32) -> Result<(), Error>;
}

/// Weekday countdown relative to the service clock.
#[cfg_attr(test, mockall::automock)]
pub trait Countdown: Send + Sync {
    fn days_left(&self, end: NaiveDate, excluded: &[NaiveDate]) -> DaysLeft;
}
