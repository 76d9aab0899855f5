//! Personal finance records and calculators.
//!
//! The calculators are pure functions over `chrono` dates so they can be
//! exercised without storage or a clock.

mod bonus;
mod mortgage;
mod savings;
mod weekdays;

pub use bonus::{
    BonusPayment, BonusPaymentDraft, BonusType, BonusValidationError, Payout, RSU_INSTALMENTS,
    UnknownBonusTypeError, YearMonth, aggregate_payouts, rsu_payouts,
};
pub use mortgage::{
    FinanceSeed, Mortgage, MortgageDraft, MortgagePatch, MortgageSeed, MortgageValidationError,
    monthly_payment,
};
pub use savings::{Savings, SavingsBalance, SavingsValidationError};
pub use weekdays::{
    DaysLeft, days_left, default_countdown_end, default_excluded_dates, remaining_weekdays,
};
