//! Shared translation of pool and Diesel failures.
//!
//! Repositories call [`classify`] and build their own port error from the
//! resulting [`StorageFailure`], so every adapter agrees on which failures are
//! connection problems and which are constraint violations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse category of a storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StorageFailure {
    /// Database unreachable or connection dropped.
    Connection(String),
    /// Unique or check constraint rejected the write.
    Constraint(String),
    /// Anything else.
    Query(String),
}

impl From<PoolError> for StorageFailure {
    fn from(error: PoolError) -> Self {
        Self::Connection(error.into_message())
    }
}

/// Categorise a Diesel error, logging the details at debug level.
pub(crate) fn classify(error: DieselError) -> StorageFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StorageFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::CheckViolation,
            info,
        ) => StorageFailure::Constraint(
            info.constraint_name()
                .map_or_else(|| info.message().to_owned(), |name| format!("violates {name}")),
        ),
        DieselError::NotFound => StorageFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            StorageFailure::Query("database query error".to_owned())
        }
        _ => StorageFailure::Query("database error".to_owned()),
    }
}
