//! Shared wiring for HTTP integration tests.
//!
//! Apps are assembled from the library's real handlers, middleware and the
//! JSON store in a temporary directory. Only the identity provider is
//! replaced, by [`ScriptedProviderClient`].

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use travelmap::Trace;
use travelmap::domain::ports::{
    FixtureBonusPaymentRepository, FixtureMortgageRepository, FixtureSavingsRepository,
    OAuthProviderClient, OAuthProviderClientError,
};
use travelmap::domain::{
    AccessPolicy, AccessToken, FinanceRepositories, FinanceService, OAuthLoginService,
    OAuthProvider, ProviderKind, ProviderTable, TravelLinksService, VisitedPlacesService,
};
use travelmap::inbound::http::access_gate::RequireAllowedEmail;
use travelmap::inbound::http::api_scope;
use travelmap::inbound::http::oauth::{authorize, callback, current_email, logout};
use travelmap::inbound::http::state::{FinancePorts, HttpState};
use travelmap::outbound::json_store::{
    JsonFinanceSeedSource, JsonLinkRepository, JsonVisitedRepository, MissingFile,
};

pub const PUBLIC_URL: &str = "https://travel.example";

/// Identity provider double returning a fixed address and counting
/// token exchanges.
#[derive(Clone)]
pub struct ScriptedProviderClient {
    email: Arc<Mutex<String>>,
    exchanges: Arc<AtomicUsize>,
}

impl ScriptedProviderClient {
    pub fn returning(email: &str) -> Self {
        Self {
            email: Arc::new(Mutex::new(email.to_owned())),
            exchanges: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_email(&self, email: &str) {
        *self.email.lock().expect("email lock") = email.to_owned();
    }

    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthProviderClient for ScriptedProviderClient {
    async fn exchange_code(
        &self,
        _provider: &OAuthProvider,
        code: &str,
        _redirect_uri: &str,
    ) -> Result<AccessToken, OAuthProviderClientError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        Ok(AccessToken::new(format!("token-for-{code}")))
    }

    async fn fetch_userinfo(
        &self,
        _provider: &OAuthProvider,
        _token: &AccessToken,
    ) -> Result<Value, OAuthProviderClientError> {
        let email = self.email.lock().expect("email lock").clone();
        Ok(json!({ "email": email, "email_verified": true }))
    }
}

fn google_only() -> ProviderTable {
    ProviderTable::new([OAuthProvider::new(
        ProviderKind::Google,
        "client-id",
        Zeroizing::new("client-secret".to_owned()),
    )])
}

/// Handler state over a fresh JSON store in `data_dir`.
pub fn json_store_state(data_dir: &Path, client: ScriptedProviderClient) -> HttpState {
    let visited = JsonVisitedRepository::open(data_dir, MissingFile::Initialise)
        .expect("visited store");
    let links = JsonLinkRepository::open(data_dir, MissingFile::Initialise).expect("links store");
    let finance = FinanceService::new(
        FinanceRepositories {
            mortgages: Arc::new(FixtureMortgageRepository),
            bonuses: Arc::new(FixtureBonusPaymentRepository),
            savings: Arc::new(FixtureSavingsRepository),
        },
        Arc::new(JsonFinanceSeedSource::new(data_dir.join("finances.json"))),
        Arc::new(DefaultClock),
    );
    HttpState::new(
        Arc::new(VisitedPlacesService::new(Arc::new(visited))),
        Arc::new(TravelLinksService::new(Arc::new(links))),
        FinancePorts::from_service(Arc::new(finance)),
        Arc::new(OAuthLoginService::new(
            google_only(),
            Arc::new(client),
            PUBLIC_URL,
        )),
    )
}

/// The production route layout with a plain HTTP session cookie.
pub fn travel_app(
    state: HttpState,
    policy: Arc<dyn AccessPolicy>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state))
        .wrap(session)
        .wrap(Trace)
        .service(api_scope().wrap(RequireAllowedEmail::new(policy)))
        .service(authorize)
        .service(callback)
        .service(current_email)
        .service(logout)
}

/// The `session` cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// The `Location` header of a redirect.
pub fn location<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location")
        .to_owned()
}

/// The `state` query parameter of a provider redirect.
pub fn state_param(location: &str) -> String {
    url::Url::parse(location)
        .expect("absolute provider URL")
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .expect("state parameter")
}
