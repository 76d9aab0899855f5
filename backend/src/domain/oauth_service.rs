//! OAuth2 authorization-code login service.
//!
//! Builds the provider redirect for `/authorize/{provider}` and validates the
//! `/callback/{provider}` round trip. Session handling stays in the HTTP
//! adapter; this service only sees the state token the adapter removed from
//! the session.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use url::Url;

use crate::domain::ports::{
    AuthorizationRequest, CallbackOutcome, CallbackParams, OAuthLogin, OAuthProviderClient,
};
use crate::domain::{Error, OAuthProvider, ProviderTable, StateToken};

/// Login service over a provider table and an outbound client.
pub struct OAuthLoginService<C> {
    providers: ProviderTable,
    client: Arc<C>,
    public_url: String,
}

impl<C> OAuthLoginService<C> {
    /// `public_url` is the externally visible origin used to build callback
    /// URLs, for example `https://travel.example.com`.
    pub fn new(providers: ProviderTable, client: Arc<C>, public_url: impl Into<String>) -> Self {
        Self {
            providers,
            client,
            public_url: public_url.into(),
        }
    }

    fn provider(&self, name: &str) -> Result<&OAuthProvider, Error> {
        self.providers
            .get(name)
            .ok_or_else(|| Error::not_found(format!("OAuth2 provider '{name}' is not configured")))
    }

    fn redirect_uri(&self, provider: &OAuthProvider) -> String {
        format!(
            "{}/callback/{}",
            self.public_url.trim_end_matches('/'),
            provider.kind()
        )
    }

    fn rejected(provider: &OAuthProvider, reason: &str) -> Error {
        warn!(provider = %provider.kind(), reason, "OAuth2 callback rejected");
        Error::unauthorized("login failed")
    }
}

#[async_trait]
impl<C> OAuthLogin for OAuthLoginService<C>
where
    C: OAuthProviderClient,
{
    fn authorize(&self, provider: &str) -> Result<AuthorizationRequest, Error> {
        let provider = self.provider(provider)?;
        let state = StateToken::generate();
        let mut location = Url::parse(&provider.endpoints().authorize_url)
            .map_err(|err| Error::internal(format!("invalid authorize URL: {err}")))?;
        location
            .query_pairs_mut()
            .append_pair("client_id", provider.client_id())
            .append_pair("redirect_uri", &self.redirect_uri(provider))
            .append_pair("response_type", "code")
            .append_pair("scope", &provider.scope_param())
            .append_pair("state", state.as_str());
        Ok(AuthorizationRequest {
            location: location.into(),
            state,
        })
    }

    async fn complete(
        &self,
        provider: &str,
        params: CallbackParams,
        expected_state: Option<StateToken>,
    ) -> Result<CallbackOutcome, Error> {
        let provider = self.provider(provider)?;

        if let Some(error) = params.error {
            warn!(
                provider = %provider.kind(),
                error = %error,
                description = params.error_description.as_deref().unwrap_or_default(),
                "identity provider reported an error"
            );
            return Ok(CallbackOutcome::Declined { error });
        }

        let state_ok = match (expected_state, params.state.as_deref()) {
            (Some(expected), Some(presented)) => expected.matches(presented),
            _ => false,
        };
        if !state_ok {
            return Err(Self::rejected(provider, "state missing or mismatched"));
        }

        let Some(code) = params.code.filter(|code| !code.is_empty()) else {
            return Err(Self::rejected(provider, "authorization code missing"));
        };

        let token = self
            .client
            .exchange_code(provider, &code, &self.redirect_uri(provider))
            .await
            .map_err(|err| Self::rejected(provider, &err.to_string()))?;
        let userinfo = self
            .client
            .fetch_userinfo(provider, &token)
            .await
            .map_err(|err| Self::rejected(provider, &err.to_string()))?;
        let email = provider
            .kind()
            .email_extractor()
            .extract(&userinfo)
            .ok_or_else(|| Self::rejected(provider, "userinfo carried no email"))?;

        info!(provider = %provider.kind(), "OAuth2 login completed");
        Ok(CallbackOutcome::SignedIn(email))
    }
}
