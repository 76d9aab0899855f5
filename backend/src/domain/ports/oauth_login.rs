//! Driving port for the OAuth2 login round trip.
//!
//! The HTTP adapter owns the session; it hands the stored state token to
//! [`OAuthLogin::complete`] after removing it, so a token can only ever be
//! presented once.

use async_trait::async_trait;

use crate::domain::{Email, Error, StateToken};

/// Redirect to the provider's consent page.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Fully encoded authorize URL.
    pub location: String,
    /// Token to store in the session before redirecting.
    pub state: StateToken,
}

/// Query parameters the provider sends to the callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// How a callback ended when it did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The provider vouched for this address.
    SignedIn(Email),
    /// The user declined or the provider reported an error.
    Declined { error: String },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthLogin: Send + Sync {
    /// Start a login; `not_found` for unknown or unconfigured providers.
    fn authorize(&self, provider: &str) -> Result<AuthorizationRequest, Error>;

    /// Finish a login. `expected_state` is the token taken from the session.
    ///
    /// Fails with `not_found` for unknown providers and `unauthorized` for a
    /// missing or mismatched state, a missing code, or any provider failure.
    async fn complete(
        &self,
        provider: &str,
        params: CallbackParams,
        expected_state: Option<StateToken>,
    ) -> Result<CallbackOutcome, Error>;
}
