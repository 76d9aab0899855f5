//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Places marked on the world or states map.
    ///
    /// A unique index on `(lower(name), which_map)` enforces the natural key.
    visited_places (id) {
        id -> Uuid,
        name -> Varchar,
        /// `world` or `states`.
        which_map -> Varchar,
        john -> Bool,
        marcia -> Bool,
        todo -> Bool,
    }
}

diesel::table! {
    /// Curated travel links.
    links (id) {
        id -> Uuid,
        name -> Varchar,
        url -> Varchar,
        notes -> Text,
        /// Server-assigned display order; never reissued.
        position -> Int8,
    }
}

diesel::table! {
    /// Single-row record of the highest link position ever issued.
    link_position_counter (singleton) {
        singleton -> Bool,
        highest_issued -> Int8,
    }
}

diesel::table! {
    mortgages (id) {
        id -> Int4,
        principal -> Float8,
        /// Annual rate as a fraction.
        interest_rate -> Float8,
        start_date -> Date,
        /// Term in months.
        loan_term -> Int4,
        monthly_escrow -> Float8,
    }
}

diesel::table! {
    bonus_payments (id) {
        id -> Int4,
        /// `cash` or `rsu`.
        bonus_type -> Varchar,
        amount -> Float8,
        payment_date -> Date,
        year_assigned -> Int4,
    }
}

diesel::table! {
    savings (id) {
        id -> Int4,
        balance -> Float8,
        created_at -> Timestamptz,
    }
}
