//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`OAuthProviderClient`], [`FinanceSeedSource`])
//! are implemented by outbound adapters. Driving ports ([`VisitedPlaces`],
//! [`TravelLinks`], the finance ledgers and [`OAuthLogin`]) are implemented by
//! domain services and called by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod bonus_payment_repository;
mod finance_ledgers;
mod finance_seed_source;
mod link_repository;
mod mortgage_repository;
mod oauth_login;
mod oauth_provider_client;
mod savings_repository;
mod travel_links;
mod visited_places;
mod visited_repository;

#[cfg(test)]
pub use bonus_payment_repository::MockBonusPaymentRepository;
pub use bonus_payment_repository::{
    BonusPaymentRepository, BonusPaymentRepositoryError, FixtureBonusPaymentRepository,
};
#[cfg(test)]
pub use finance_ledgers::{
    MockBonusLedger, MockCountdown, MockMortgageLedger, MockSavingsLedger,
};
pub use finance_ledgers::{BonusLedger, Countdown, MortgageLedger, MortgageSummary, SavingsLedger};
#[cfg(test)]
pub use finance_seed_source::MockFinanceSeedSource;
pub use finance_seed_source::{FinanceSeedSource, FinanceSeedSourceError};
#[cfg(test)]
pub use link_repository::MockLinkRepository;
pub use link_repository::{FixtureLinkRepository, LinkRepository, LinkRepositoryError};
#[cfg(test)]
pub use mortgage_repository::MockMortgageRepository;
pub use mortgage_repository::{
    FixtureMortgageRepository, MortgageRepository, MortgageRepositoryError,
};
#[cfg(test)]
pub use oauth_login::MockOAuthLogin;
pub use oauth_login::{AuthorizationRequest, CallbackOutcome, CallbackParams, OAuthLogin};
#[cfg(test)]
pub use oauth_provider_client::MockOAuthProviderClient;
pub use oauth_provider_client::{OAuthProviderClient, OAuthProviderClientError};
#[cfg(test)]
pub use savings_repository::MockSavingsRepository;
pub use savings_repository::{
    FixtureSavingsRepository, SavingsRepository, SavingsRepositoryError,
};
#[cfg(test)]
pub use travel_links::MockTravelLinks;
pub use travel_links::{FixtureTravelLinks, TravelLinks};
#[cfg(test)]
pub use visited_places::MockVisitedPlaces;
pub use visited_places::{FixtureVisitedPlaces, UpsertOutcome, VisitedPlaces};
#[cfg(test)]
pub use visited_repository::MockVisitedRepository;
pub use visited_repository::{
    FixtureVisitedRepository, VisitedRepository, VisitedRepositoryError,
};
