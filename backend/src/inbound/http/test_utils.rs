//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use serde_json::Value;
use std::sync::Arc;

use super::state::{FinancePorts, HttpState};
use crate::domain::ports::{
    FixtureTravelLinks, FixtureVisitedPlaces, MockBonusLedger, MockCountdown, MockMortgageLedger,
    MockOAuthLogin, MockSavingsLedger,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Handler state backed by fixtures and strict mocks.
///
/// Override the port under test with struct update syntax:
/// `HttpState { links: Arc::new(mock), ..fixture_state() }`. Any call to a
/// mock left in place panics, which keeps tests honest about the ports they
/// touch.
pub fn fixture_state() -> HttpState {
    HttpState::new(
        Arc::new(FixtureVisitedPlaces),
        Arc::new(FixtureTravelLinks),
        FinancePorts {
            mortgages: Arc::new(MockMortgageLedger::new()),
            bonuses: Arc::new(MockBonusLedger::new()),
            savings: Arc::new(MockSavingsLedger::new()),
            countdown: Arc::new(MockCountdown::new()),
        },
        Arc::new(MockOAuthLogin::new()),
    )
}

/// Read a JSON response body.
pub async fn read_json<B>(res: ServiceResponse<B>) -> Value
where
    B: MessageBody,
{
    let body = actix_web::test::read_body(res).await;
    serde_json::from_slice(&body).expect("JSON body")
}
