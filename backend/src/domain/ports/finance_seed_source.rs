//! Driven port for the finance seed document used by clear-and-reload.

use async_trait::async_trait;

use crate::domain::finance::FinanceSeed;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading the finance seed.
    pub enum FinanceSeedSourceError {
        /// Seed file is missing or unreadable.
        Unavailable { message: String } =>
            "finance seed unavailable: {message}",
        /// Seed file is not a valid seed document.
        Malformed { message: String } =>
            "finance seed malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinanceSeedSource: Send + Sync {
    async fn load(&self) -> Result<FinanceSeed, FinanceSeedSourceError>;
}
