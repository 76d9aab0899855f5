//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BonusLedger, Countdown, MortgageLedger, OAuthLogin, SavingsLedger, TravelLinks, VisitedPlaces,
};

/// Parameter object bundling the finance ports.
#[derive(Clone)]
pub struct FinancePorts {
    pub mortgages: Arc<dyn MortgageLedger>,
    pub bonuses: Arc<dyn BonusLedger>,
    pub savings: Arc<dyn SavingsLedger>,
    pub countdown: Arc<dyn Countdown>,
}

impl FinancePorts {
    /// Use one service for every finance port.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use travelmap::domain::ports::{
    ///     FixtureBonusPaymentRepository, FixtureMortgageRepository, FixtureSavingsRepository,
    /// };
    /// use travelmap::domain::{FinanceRepositories, FinanceService};
    /// use travelmap::inbound::http::state::FinancePorts;
    /// use travelmap::outbound::json_store::JsonFinanceSeedSource;
    ///
    /// let service = Arc::new(FinanceService::new(
    ///     FinanceRepositories {
    ///         mortgages: Arc::new(FixtureMortgageRepository),
    ///         bonuses: Arc::new(FixtureBonusPaymentRepository),
    ///         savings: Arc::new(FixtureSavingsRepository),
    ///     },
    ///     Arc::new(JsonFinanceSeedSource::new("instance/finances.json")),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let ports = FinancePorts::from_service(service);
    /// let _savings = ports.savings.clone();
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: MortgageLedger + BonusLedger + SavingsLedger + Countdown + 'static,
    {
        Self {
            mortgages: service.clone(),
            bonuses: service.clone(),
            savings: service.clone(),
            countdown: service,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub visited: Arc<dyn VisitedPlaces>,
    pub links: Arc<dyn TravelLinks>,
    pub mortgages: Arc<dyn MortgageLedger>,
    pub bonuses: Arc<dyn BonusLedger>,
    pub savings: Arc<dyn SavingsLedger>,
    pub countdown: Arc<dyn Countdown>,
    pub oauth: Arc<dyn OAuthLogin>,
}

impl HttpState {
    /// Assemble state from the resource, finance and login ports.
    pub fn new(
        visited: Arc<dyn VisitedPlaces>,
        links: Arc<dyn TravelLinks>,
        finance: FinancePorts,
        oauth: Arc<dyn OAuthLogin>,
    ) -> Self {
        let FinancePorts {
            mortgages,
            bonuses,
            savings,
            countdown,
        } = finance;
        Self {
            visited,
            links,
            mortgages,
            bonuses,
            savings,
            countdown,
            oauth,
        }
    }
}
