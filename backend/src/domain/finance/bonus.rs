//! Bonus payments and their payout schedules.
//!
//! Cash bonuses pay out once, in the month of `payment_date`. RSU grants vest
//! in six equal instalments every June and December, starting the June after
//! the year they were assigned.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of instalments an RSU grant is split into.
pub const RSU_INSTALMENTS: u32 = 6;

const RSU_VESTING_MONTHS: [u32; 2] = [6, 12];

/// Kind of bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BonusType {
    Cash,
    Rsu,
}

impl BonusType {
    /// Storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Rsu => "rsu",
        }
    }
}

impl fmt::Display for BonusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for unknown bonus labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bonus_type '{0}'; expected cash or rsu")]
pub struct UnknownBonusTypeError(pub String);

impl FromStr for BonusType {
    type Err = UnknownBonusTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "rsu" => Ok(Self::Rsu),
            _ => Err(UnknownBonusTypeError(s.to_owned())),
        }
    }
}

/// Calendar month used to decide which payouts are still upcoming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

/// Amount paid out in one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Payout {
    pub year: i32,
    pub month: u32,
    pub amount: f64,
}

impl Payout {
    fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }
}

/// Upcoming RSU instalments for a grant of `amount` assigned in
/// `year_assigned`, as seen from `as_of`.
///
/// The schedule always has [`RSU_INSTALMENTS`] slots; those before `as_of`
/// have already vested and are skipped.
///
/// # Examples
/// ```
/// use travelmap::domain::finance::{YearMonth, rsu_payouts};
///
/// let payouts = rsu_payouts(6000.0, 2023, YearMonth::new(2023, 1));
/// assert_eq!(payouts.len(), 6);
/// assert_eq!((payouts[0].year, payouts[0].month), (2024, 6));
/// assert_eq!((payouts[5].year, payouts[5].month), (2026, 12));
/// ```
#[must_use]
pub fn rsu_payouts(amount: f64, year_assigned: i32, as_of: YearMonth) -> Vec<Payout> {
    let instalment = amount / f64::from(RSU_INSTALMENTS);
    let first_year = year_assigned.saturating_add(1);
    (first_year..)
        .flat_map(|year| RSU_VESTING_MONTHS.map(|month| YearMonth::new(year, month)))
        .take(RSU_INSTALMENTS as usize)
        .filter(|slot| *slot >= as_of)
        .map(|slot| Payout {
            year: slot.year,
            month: slot.month,
            amount: instalment,
        })
        .collect()
}

/// Sum payouts per month, sorted chronologically.
#[must_use]
pub fn aggregate_payouts(payouts: impl IntoIterator<Item = Payout>) -> Vec<Payout> {
    let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for payout in payouts {
        *totals.entry(payout.year_month()).or_insert(0.0) += payout.amount;
    }
    totals
        .into_iter()
        .map(|(slot, amount)| Payout {
            year: slot.year,
            month: slot.month,
            amount,
        })
        .collect()
}

/// Stored bonus payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BonusPayment {
    pub id: i32,
    pub bonus_type: BonusType,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub year_assigned: i32,
}

impl BonusPayment {
    /// Payouts from `as_of` onwards.
    #[must_use]
    pub fn upcoming_payouts(&self, as_of: YearMonth) -> Vec<Payout> {
        match self.bonus_type {
            BonusType::Rsu => rsu_payouts(self.amount, self.year_assigned, as_of),
            BonusType::Cash => {
                let slot = YearMonth::of(self.payment_date);
                if slot < as_of {
                    return Vec::new();
                }
                vec![Payout {
                    year: slot.year,
                    month: slot.month,
                    amount: self.amount,
                }]
            }
        }
    }
}

/// Validation failures for bonus payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BonusValidationError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error(transparent)]
    UnknownType(#[from] UnknownBonusTypeError),
}

/// Validated payload for a new bonus payment.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusPaymentDraft {
    bonus_type: BonusType,
    amount: f64,
    payment_date: NaiveDate,
    year_assigned: i32,
}

impl BonusPaymentDraft {
    pub fn try_new(
        bonus_type: BonusType,
        amount: f64,
        payment_date: NaiveDate,
        year_assigned: i32,
    ) -> Result<Self, BonusValidationError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(BonusValidationError::NonPositiveAmount);
        }
        Ok(Self {
            bonus_type,
            amount,
            payment_date,
            year_assigned,
        })
    }

    #[must_use]
    pub fn bonus_type(&self) -> BonusType {
        self.bonus_type
    }

    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    #[must_use]
    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    #[must_use]
    pub fn year_assigned(&self) -> i32 {
        self.year_assigned
    }

    #[must_use]
    pub fn into_payment(self, id: i32) -> BonusPayment {
        BonusPayment {
            id,
            bonus_type: self.bonus_type,
            amount: self.amount,
            payment_date: self.payment_date,
            year_assigned: self.year_assigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn slots(payouts: &[Payout]) -> Vec<(i32, u32)> {
        payouts.iter().map(|p| (p.year, p.month)).collect()
    }

    #[rstest]
    fn grant_vests_in_six_equal_instalments() {
        let payouts = rsu_payouts(6000.0, 2023, YearMonth::new(2023, 1));
        assert_eq!(
            slots(&payouts),
            vec![
                (2024, 6),
                (2024, 12),
                (2025, 6),
                (2025, 12),
                (2026, 6),
                (2026, 12)
            ]
        );
        assert!(payouts.iter().all(|p| p.amount == 1000.0));
    }

    #[rstest]
    #[case(YearMonth::new(2024, 6), (2024, 6), 6)]
    #[case(YearMonth::new(2024, 7), (2024, 12), 5)]
    #[case(YearMonth::new(2025, 12), (2025, 12), 3)]
    #[case(YearMonth::new(2027, 1), (0, 0), 0)]
    fn already_vested_instalments_are_skipped(
        #[case] as_of: YearMonth,
        #[case] first: (i32, u32),
        #[case] remaining: usize,
    ) {
        let payouts = rsu_payouts(6000.0, 2023, as_of);
        assert_eq!(payouts.len(), remaining);
        if let Some(payout) = payouts.first() {
            assert_eq!((payout.year, payout.month), first);
        }
    }

    #[rstest]
    fn aggregation_sums_matching_months_in_order() {
        let mut payouts = rsu_payouts(1200.0, 2024, YearMonth::new(2024, 1));
        payouts.extend(rsu_payouts(600.0, 2023, YearMonth::new(2024, 1)));
        let aggregated = aggregate_payouts(payouts);

        assert_eq!(aggregated.first().map(|p| (p.year, p.month)), Some((2024, 6)));
        assert_eq!(aggregated.first().map(|p| p.amount), Some(100.0));
        let overlap = aggregated
            .iter()
            .find(|p| (p.year, p.month) == (2025, 6))
            .expect("overlapping month present");
        assert_eq!(overlap.amount, 300.0);
        assert!(aggregated.windows(2).all(|pair| pair[0].year_month() < pair[1].year_month()));
    }

    #[rstest]
    fn cash_bonus_pays_once_in_its_month() {
        let bonus = BonusPaymentDraft::try_new(
            BonusType::Cash,
            2500.0,
            NaiveDate::from_ymd_opt(2024, 3, 15).expect("date"),
            2023,
        )
        .expect("valid bonus")
        .into_payment(7);
        assert_eq!(slots(&bonus.upcoming_payouts(YearMonth::new(2024, 1))), vec![(2024, 3)]);
        assert!(bonus.upcoming_payouts(YearMonth::new(2024, 4)).is_empty());
    }

    #[rstest]
    #[case("RSU", BonusType::Rsu)]
    #[case("cash", BonusType::Cash)]
    fn parses_bonus_type_labels(#[case] raw: &str, #[case] expected: BonusType) {
        assert_eq!(raw.parse::<BonusType>(), Ok(expected));
    }

    #[rstest]
    fn rejects_non_positive_amounts() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).expect("date");
        let result = BonusPaymentDraft::try_new(BonusType::Rsu, 0.0, date, 2024);
        assert_eq!(result, Err(BonusValidationError::NonPositiveAmount));
    }
}
