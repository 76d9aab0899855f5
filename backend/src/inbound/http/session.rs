//! Session helpers so handlers never touch `actix_session` directly.
//!
//! The cookie carries two keys: the signed-in `email` and the one-time
//! `oauth2_state` issued by `/authorize/{provider}`.

use actix_session::{Session, SessionExt};
use actix_web::dev::{Payload, ServiceRequest};
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Email, Error, StateToken};

pub(crate) const EMAIL_KEY: &str = "email";
pub(crate) const OAUTH_STATE_KEY: &str = "oauth2_state";

/// Newtype wrapper exposing the travel map's session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Session attached to a request still inside the middleware chain.
    pub fn from_service_request(req: &ServiceRequest) -> Self {
        Self(req.get_session())
    }

    /// The signed-in email, if any.
    ///
    /// A value that no longer parses as an email is treated as signed out.
    pub fn email(&self) -> Result<Option<Email>, Error> {
        let raw = self
            .0
            .get::<String>(EMAIL_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match Email::new(&value) {
            Ok(email) => Some(email),
            Err(error) => {
                warn!(%error, "invalid email in session cookie");
                None
            }
        }))
    }

    /// Record a completed login and rotate the session id.
    pub fn sign_in(&self, email: &Email) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(EMAIL_KEY, email.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Store a freshly issued state token, replacing any earlier one.
    pub fn store_oauth_state(&self, state: &StateToken) -> Result<(), Error> {
        self.0
            .insert(OAUTH_STATE_KEY, state.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Remove and return the pending state token so it can be used once.
    pub fn take_oauth_state(&self) -> Result<Option<StateToken>, Error> {
        self.0
            .remove_as::<String>(OAUTH_STATE_KEY)
            .transpose()
            .map(|stored| stored.map(StateToken::from_stored))
            .map_err(|raw| {
                warn!(raw_len = raw.len(), "unreadable OAuth2 state in session");
                Error::unauthorized("login failed")
            })
    }

    /// Drop every key and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
