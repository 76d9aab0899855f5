//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to
//! domain types before returning.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bonus_payments, links, mortgages, savings, visited_places};

// ---------------------------------------------------------------------------
// Visited places
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = visited_places)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VisitedPlaceRow {
    pub id: Uuid,
    pub name: String,
    pub which_map: String,
    pub john: bool,
    pub marcia: bool,
    pub todo: bool,
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LinkRow {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub notes: String,
    pub position: i64,
}

// ---------------------------------------------------------------------------
// Mortgages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = mortgages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MortgageRow {
    pub id: i32,
    pub principal: f64,
    pub interest_rate: f64,
    pub start_date: NaiveDate,
    pub loan_term: i32,
    pub monthly_escrow: f64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mortgages)]
pub(crate) struct NewMortgageRow {
    pub principal: f64,
    pub interest_rate: f64,
    pub start_date: NaiveDate,
    pub loan_term: i32,
    pub monthly_escrow: f64,
}

/// Sparse changeset; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = mortgages)]
pub(crate) struct MortgageChanges {
    pub principal: Option<f64>,
    pub interest_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub loan_term: Option<i32>,
    pub monthly_escrow: Option<f64>,
}

// ---------------------------------------------------------------------------
// Bonus payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bonus_payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BonusPaymentRow {
    pub id: i32,
    pub bonus_type: String,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub year_assigned: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bonus_payments)]
pub(crate) struct NewBonusPaymentRow<'a> {
    pub bonus_type: &'a str,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub year_assigned: i32,
}

// ---------------------------------------------------------------------------
// Savings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = savings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SavingsRow {
    pub id: i32,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}
