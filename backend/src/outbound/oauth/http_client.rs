//! Reqwest-backed OAuth2 provider client.
//!
//! Owns transport details only: the form-encoded code exchange, the bearer
//! userinfo request, timeouts, and mapping HTTP failures onto the port's
//! error type. Nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::dto::TokenResponseDto;
use crate::domain::ports::{OAuthProviderClient, OAuthProviderClientError};
use crate::domain::{AccessToken, OAuthProvider};

const USER_AGENT: &str = concat!("travelmap/", env!("CARGO_PKG_VERSION"));

/// Provider client performing real HTTP calls.
#[derive(Clone)]
pub struct HttpOAuthProviderClient {
    client: Client,
}

impl HttpOAuthProviderClient {
    /// Build a client whose connect and total request time are capped at
    /// `timeout`.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            // GitHub rejects API calls without a user agent.
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl OAuthProviderClient for HttpOAuthProviderClient {
    async fn exchange_code(
        &self,
        provider: &OAuthProvider,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, OAuthProviderClientError> {
        let form = [
            ("client_id", provider.client_id()),
            ("client_secret", provider.client_secret()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ];
        let response = self
            .client
            .post(provider.endpoints().token_url.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = success_body(response).await?;
        parse_token(&body)
    }

    async fn fetch_userinfo(
        &self,
        provider: &OAuthProvider,
        token: &AccessToken,
    ) -> Result<Value, OAuthProviderClientError> {
        let response = self
            .client
            .get(provider.endpoints().userinfo_url.as_str())
            .bearer_auth(token.secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = success_body(response).await?;
        serde_json::from_slice(&body).map_err(|error| {
            OAuthProviderClientError::invalid_response(format!("userinfo is not JSON: {error}"))
        })
    }
}

async fn success_body(response: reqwest::Response) -> Result<Vec<u8>, OAuthProviderClientError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        debug!(status = status.as_u16(), "identity provider returned an error status");
        return Err(map_status_error(status));
    }
    Ok(body.to_vec())
}

fn parse_token(body: &[u8]) -> Result<AccessToken, OAuthProviderClientError> {
    let decoded: TokenResponseDto = serde_json::from_slice(body).map_err(|error| {
        OAuthProviderClientError::invalid_response(format!("token response is not JSON: {error}"))
    })?;
    decoded
        .into_token()
        .map(AccessToken::new)
        .ok_or_else(|| OAuthProviderClientError::invalid_response("token response has no access_token"))
}

fn map_transport_error(error: reqwest::Error) -> OAuthProviderClientError {
    if error.is_timeout() {
        OAuthProviderClientError::transport(format!("timed out: {error}"))
    } else {
        OAuthProviderClientError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> OAuthProviderClientError {
    OAuthProviderClientError::rejected(status.as_u16())
}
