//! Driven port for the outbound half of the OAuth2 code flow.
//!
//! Adapters perform the token exchange and the userinfo request. They never
//! retry: any failure ends the login attempt with `401 Unauthorized`.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{AccessToken, OAuthProvider};

use super::define_port_error;

define_port_error! {
    /// Errors raised while talking to an identity provider.
    pub enum OAuthProviderClientError {
        /// Provider could not be reached or timed out.
        Transport { message: String } =>
            "identity provider request failed: {message}",
        /// Provider answered with a non-success status.
        Rejected { status: u16 } =>
            "identity provider rejected the request with status {status}",
        /// Response body was not what the provider documents.
        InvalidResponse { message: String } =>
            "identity provider response was invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthProviderClient: Send + Sync {
    /// Exchange an authorization code for an access token.
    async fn exchange_code(
        &self,
        provider: &OAuthProvider,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, OAuthProviderClientError>;

    /// Fetch the provider's userinfo document with a bearer token.
    async fn fetch_userinfo(
        &self,
        provider: &OAuthProvider,
        token: &AccessToken,
    ) -> Result<Value, OAuthProviderClientError>;
}
