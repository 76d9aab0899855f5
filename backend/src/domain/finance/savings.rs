//! Savings balance snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A recorded savings balance. `created_at` is assigned by storage and orders
/// snapshots; the newest one is the current balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Savings {
    pub id: i32,
    #[schema(example = 15250.75)]
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

/// Validation failures for savings payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SavingsValidationError {
    #[error("balance must be a finite number")]
    NonFiniteBalance,
}

/// Validated balance for a new or updated snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsBalance(f64);

impl SavingsBalance {
    /// Balances may be negative (overdrawn) but must be finite.
    pub fn try_new(balance: f64) -> Result<Self, SavingsValidationError> {
        if balance.is_finite() {
            Ok(Self(balance))
        } else {
            Err(SavingsValidationError::NonFiniteBalance)
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}
