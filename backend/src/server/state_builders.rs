//! Builders wiring adapters into the HTTP state.
//!
//! A database pool selects the Diesel repositories. Without one, visited
//! places and links come from the JSON store and the finance ledgers use
//! fixtures that answer `503`.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use travelmap::domain::ports::{
    FixtureBonusPaymentRepository, FixtureMortgageRepository, FixtureSavingsRepository,
    OAuthLogin, TravelLinks, VisitedPlaces,
};
use travelmap::domain::{
    FinanceRepositories, FinanceService, OAuthLoginService, TravelLinksService,
    VisitedPlacesService,
};
use travelmap::inbound::http::state::{FinancePorts, HttpState};
use travelmap::outbound::json_store::{
    JsonFinanceSeedSource, JsonLinkRepository, JsonStoreError, JsonVisitedRepository, MissingFile,
};
use travelmap::outbound::oauth::HttpOAuthProviderClient;
use travelmap::outbound::persistence::{
    DbPool, DieselBonusPaymentRepository, DieselLinkRepository, DieselMortgageRepository,
    DieselSavingsRepository, DieselVisitedRepository,
};

use super::ServerConfig;

/// Failures while assembling adapters at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    #[error("failed to open JSON store: {0}")]
    JsonStore(#[from] JsonStoreError),
    #[error("failed to build OAuth2 HTTP client: {0}")]
    OAuthClient(#[from] reqwest::Error),
}

/// Pick the Diesel adapter when a pool is configured, otherwise the fallback.
fn select_by_pool<Port, E>(
    pool: Option<&DbPool>,
    with_pool: impl FnOnce(DbPool) -> Arc<Port>,
    fallback: impl FnOnce() -> Result<Arc<Port>, E>,
) -> Result<Arc<Port>, E>
where
    Port: ?Sized,
{
    match pool {
        Some(pool) => Ok(with_pool(pool.clone())),
        None => fallback(),
    }
}

fn missing_file_policy(config: &ServerConfig) -> MissingFile {
    if config.settings.init_data {
        MissingFile::Initialise
    } else {
        MissingFile::Fail
    }
}

fn build_visited(config: &ServerConfig) -> Result<Arc<dyn VisitedPlaces>, JsonStoreError> {
    select_by_pool(
        config.db_pool.as_ref(),
        |pool| {
            Arc::new(VisitedPlacesService::new(Arc::new(
                DieselVisitedRepository::new(pool),
            ))) as Arc<dyn VisitedPlaces>
        },
        || {
            let repo =
                JsonVisitedRepository::open(&config.settings.data_dir(), missing_file_policy(config))?;
            Ok(Arc::new(VisitedPlacesService::new(Arc::new(repo))) as Arc<dyn VisitedPlaces>)
        },
    )
}

fn build_links(config: &ServerConfig) -> Result<Arc<dyn TravelLinks>, JsonStoreError> {
    select_by_pool(
        config.db_pool.as_ref(),
        |pool| {
            Arc::new(TravelLinksService::new(Arc::new(DieselLinkRepository::new(pool))))
                as Arc<dyn TravelLinks>
        },
        || {
            let repo =
                JsonLinkRepository::open(&config.settings.data_dir(), missing_file_policy(config))?;
            Ok(Arc::new(TravelLinksService::new(Arc::new(repo))) as Arc<dyn TravelLinks>)
        },
    )
}

fn build_finance(config: &ServerConfig) -> FinancePorts {
    let seed = Arc::new(JsonFinanceSeedSource::new(config.settings.finance_seed()));
    let clock = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => FinancePorts::from_service(Arc::new(FinanceService::new(
            FinanceRepositories {
                mortgages: Arc::new(DieselMortgageRepository::new(pool.clone())),
                bonuses: Arc::new(DieselBonusPaymentRepository::new(pool.clone())),
                savings: Arc::new(DieselSavingsRepository::new(pool.clone())),
            },
            seed,
            clock,
        ))),
        None => FinancePorts::from_service(Arc::new(FinanceService::new(
            FinanceRepositories {
                mortgages: Arc::new(FixtureMortgageRepository),
                bonuses: Arc::new(FixtureBonusPaymentRepository),
                savings: Arc::new(FixtureSavingsRepository),
            },
            seed,
            clock,
        ))),
    }
}

fn build_oauth(config: &ServerConfig) -> Result<Arc<dyn OAuthLogin>, reqwest::Error> {
    let client = HttpOAuthProviderClient::new(config.settings.oauth_timeout())?;
    Ok(Arc::new(OAuthLoginService::new(
        config.auth.providers.clone(),
        Arc::new(client),
        config.settings.public_url(),
    )))
}

/// Build the shared HTTP state from the configured adapters.
pub(super) fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, StateBuildError> {
    let visited = build_visited(config)?;
    let links = build_links(config)?;
    let finance = build_finance(config);
    let oauth = build_oauth(config)?;
    Ok(web::Data::new(HttpState::new(visited, links, finance, oauth)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use rstest::rstest;
    use travelmap::domain::{AllowList, AllowListPolicy, ErrorCode, ProviderTable, WhichMap};
    use travelmap::inbound::http::auth_config::AuthSettings;
    use travelmap::inbound::http::session_config::{BuildMode, session_settings_from_env};

    use crate::server::ServerSettings;

    fn config_for(data_dir: &Path, init_data: bool) -> ServerConfig {
        let mut env = mockable::MockEnv::new();
        env.expect_string().returning(|_| None);
        let session = session_settings_from_env(&env, BuildMode::Debug).expect("session settings");
        let settings = ServerSettings {
            bind_addr: None,
            data_dir: Some(data_dir.to_path_buf()),
            database_url: None,
            public_url: None,
            finance_seed: None,
            oauth_timeout_secs: Some(1),
            init_data,
        };
        let auth = AuthSettings {
            policy: Arc::new(AllowListPolicy::new(AllowList::default())),
            providers: ProviderTable::default(),
        };
        ServerConfig::new(settings, session, auth)
    }

    #[rstest]
    #[tokio::test]
    async fn json_store_is_initialised_when_requested() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = build_http_state(&config_for(dir.path(), true)).expect("state");

        let places = state.visited.list(WhichMap::World).await.expect("list");
        assert!(places.is_empty());
        assert!(state.links.list().await.expect("links").is_empty());
    }

    #[rstest]
    fn missing_json_store_fails_without_init() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = build_http_state(&config_for(dir.path(), false)).err().expect("missing store");
        assert!(matches!(error, StateBuildError::JsonStore(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn finance_without_database_is_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = build_http_state(&config_for(dir.path(), true)).expect("state");

        let error = state.savings.list_savings().await.expect_err("no database");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
