//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin translators between Diesel row structs and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.
//!
//! ```ignore
//! use travelmap::outbound::persistence::{DbPool, DieselVisitedRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/travelmap")).await?;
//! let repo = DieselVisitedRepository::new(pool);
//! ```

mod diesel_bonus_payment_repository;
mod diesel_error_mapping;
mod diesel_link_repository;
mod diesel_mortgage_repository;
mod diesel_savings_repository;
mod diesel_visited_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_bonus_payment_repository::DieselBonusPaymentRepository;
pub use diesel_link_repository::DieselLinkRepository;
pub use diesel_mortgage_repository::DieselMortgageRepository;
pub use diesel_savings_repository::DieselSavingsRepository;
pub use diesel_visited_repository::DieselVisitedRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
