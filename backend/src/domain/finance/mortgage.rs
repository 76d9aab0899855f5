//! Mortgage records and the amortisation formula.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation failures for mortgage payloads.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MortgageValidationError {
    /// Principal must be a positive, finite amount.
    #[error("principal must be greater than zero")]
    NonPositivePrincipal,
    /// Rate must be a finite, non-negative annual fraction.
    #[error("interest_rate must be zero or greater")]
    NegativeRate,
    /// Term must be at least one month.
    #[error("loan_term must be at least one month")]
    ZeroTerm,
    /// Escrow must be a finite, non-negative amount.
    #[error("monthly_escrow must be zero or greater")]
    NegativeEscrow,
}

/// Fixed-rate monthly payment (principal plus interest).
///
/// `annual_rate` is a fraction (`0.06` for six percent) and `term_months` the
/// number of monthly instalments. A zero rate degenerates to straight-line
/// repayment.
///
/// # Examples
/// ```
/// use travelmap::domain::finance::monthly_payment;
///
/// let payment = monthly_payment(300_000.0, 0.06, 360).unwrap();
/// assert!((payment - 1798.65).abs() < 0.01);
/// assert_eq!(monthly_payment(1200.0, 0.0, 12).unwrap(), 100.0);
/// ```
pub fn monthly_payment(
    principal: f64,
    annual_rate: f64,
    term_months: u32,
) -> Result<f64, MortgageValidationError> {
    validate_principal(principal)?;
    validate_rate(annual_rate)?;
    if term_months == 0 {
        return Err(MortgageValidationError::ZeroTerm);
    }

    let n = f64::from(term_months);
    let r = annual_rate / 12.0;
    if r == 0.0 {
        return Ok(principal / n);
    }
    let growth = (1.0 + r).powf(n);
    Ok(principal * r * growth / (growth - 1.0))
}

fn validate_principal(principal: f64) -> Result<(), MortgageValidationError> {
    if principal.is_finite() && principal > 0.0 {
        Ok(())
    } else {
        Err(MortgageValidationError::NonPositivePrincipal)
    }
}

fn validate_rate(rate: f64) -> Result<(), MortgageValidationError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(MortgageValidationError::NegativeRate)
    }
}

fn validate_escrow(escrow: f64) -> Result<(), MortgageValidationError> {
    if escrow.is_finite() && escrow >= 0.0 {
        Ok(())
    } else {
        Err(MortgageValidationError::NegativeEscrow)
    }
}

fn validate_term(term: i32) -> Result<u32, MortgageValidationError> {
    u32::try_from(term)
        .ok()
        .filter(|months| *months > 0)
        .ok_or(MortgageValidationError::ZeroTerm)
}

/// Stored mortgage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Mortgage {
    pub id: i32,
    #[schema(example = 300000.0)]
    pub principal: f64,
    /// Annual rate as a fraction.
    #[schema(example = 0.06)]
    pub interest_rate: f64,
    pub start_date: NaiveDate,
    /// Term in months.
    #[schema(example = 360)]
    pub loan_term: i32,
    pub monthly_escrow: f64,
}

impl Mortgage {
    /// Principal and interest due each month.
    pub fn monthly_payment(&self) -> Result<f64, MortgageValidationError> {
        monthly_payment(
            self.principal,
            self.interest_rate,
            validate_term(self.loan_term)?,
        )
    }

    /// Merge a validated patch.
    pub fn apply(&mut self, patch: &MortgagePatch) {
        if let Some(principal) = patch.principal {
            self.principal = principal;
        }
        if let Some(rate) = patch.interest_rate {
            self.interest_rate = rate;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(term) = patch.loan_term {
            self.loan_term = term;
        }
        if let Some(escrow) = patch.monthly_escrow {
            self.monthly_escrow = escrow;
        }
    }
}

/// Validated payload for a new mortgage.
#[derive(Debug, Clone, PartialEq)]
pub struct MortgageDraft {
    principal: f64,
    interest_rate: f64,
    start_date: NaiveDate,
    loan_term: i32,
    monthly_escrow: f64,
}

impl MortgageDraft {
    /// Validate the fields of a new mortgage.
    pub fn try_new(
        principal: f64,
        interest_rate: f64,
        start_date: NaiveDate,
        loan_term: i32,
        monthly_escrow: f64,
    ) -> Result<Self, MortgageValidationError> {
        validate_principal(principal)?;
        validate_rate(interest_rate)?;
        validate_term(loan_term)?;
        validate_escrow(monthly_escrow)?;
        Ok(Self {
            principal,
            interest_rate,
            start_date,
            loan_term,
            monthly_escrow,
        })
    }

    #[must_use]
    pub fn principal(&self) -> f64 {
        self.principal
    }

    #[must_use]
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn loan_term(&self) -> i32 {
        self.loan_term
    }

    #[must_use]
    pub fn monthly_escrow(&self) -> f64 {
        self.monthly_escrow
    }

    /// Attach the identifier assigned by storage.
    #[must_use]
    pub fn into_mortgage(self, id: i32) -> Mortgage {
        Mortgage {
            id,
            principal: self.principal,
            interest_rate: self.interest_rate,
            start_date: self.start_date,
            loan_term: self.loan_term,
            monthly_escrow: self.monthly_escrow,
        }
    }
}

/// Partial update for a mortgage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MortgagePatch {
    pub principal: Option<f64>,
    pub interest_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub loan_term: Option<i32>,
    pub monthly_escrow: Option<f64>,
}

impl MortgagePatch {
    /// Check every supplied field against the same rules as a new mortgage.
    pub fn validate(self) -> Result<Self, MortgageValidationError> {
        self.principal.map(validate_principal).transpose()?;
        self.interest_rate.map(validate_rate).transpose()?;
        self.loan_term.map(validate_term).transpose()?;
        self.monthly_escrow.map(validate_escrow).transpose()?;
        Ok(self)
    }
}

/// Contents of the finance seed file used by clear-and-reload.
///
/// ```json
/// {"mortgage": {"principal": 350000, "interest_rate": 0.055,
///   "start_date": "2021-08-01", "loan_term": 360, "monthly_escrow": 450}}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FinanceSeed {
    pub mortgage: MortgageSeed,
}

/// Unvalidated mortgage section of [`FinanceSeed`].
#[derive(Debug, Clone, Deserialize)]
pub struct MortgageSeed {
    pub principal: f64,
    pub interest_rate: f64,
    pub start_date: NaiveDate,
    pub loan_term: i32,
    #[serde(default)]
    pub monthly_escrow: f64,
}

impl TryFrom<MortgageSeed> for MortgageDraft {
    type Error = MortgageValidationError;

    fn try_from(seed: MortgageSeed) -> Result<Self, Self::Error> {
        Self::try_new(
            seed.principal,
            seed.interest_rate,
            seed.start_date,
            seed.loan_term,
            seed.monthly_escrow,
        )
    }
}
