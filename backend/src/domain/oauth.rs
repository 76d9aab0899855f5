//! OAuth2 provider descriptions, state tokens and email extraction.
//!
//! Only the authorization-code grant is supported. Each provider has fixed
//! endpoints; client credentials come from configuration and a provider
//! without a client id is treated as absent.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand::rngs::OsRng;
use serde_json::Value;
use zeroize::Zeroizing;

use super::Email;

/// Identity providers the application knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderKind {
    Google,
    Github,
    Apple,
}

impl ProviderKind {
    /// Every supported provider.
    pub const ALL: [Self; 3] = [Self::Google, Self::Github, Self::Apple];

    /// Path segment used in `/authorize/{provider}` and `/callback/{provider}`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Apple => "apple",
        }
    }

    /// Prefix of the `{PREFIX}_CLIENT_ID` / `{PREFIX}_CLIENT_SECRET` variables.
    #[must_use]
    pub const fn env_prefix(self) -> &'static str {
        match self {
            Self::Google => "GOOGLE",
            Self::Github => "GITHUB",
            Self::Apple => "APPLE",
        }
    }

    /// Fixed endpoints and scopes for this provider.
    #[must_use]
    pub fn endpoints(self) -> ProviderEndpoints {
        match self {
            Self::Google => ProviderEndpoints {
                authorize_url: "https://accounts.google.com/o/oauth2/auth".to_owned(),
                token_url: "https://accounts.google.com/o/oauth2/token".to_owned(),
                userinfo_url: "https://www.googleapis.com/oauth2/v3/userinfo".to_owned(),
                scopes: vec!["https://www.googleapis.com/auth/userinfo.email".to_owned()],
            },
            Self::Github => ProviderEndpoints {
                authorize_url: "https://github.com/login/oauth/authorize".to_owned(),
                token_url: "https://github.com/login/oauth/access_token".to_owned(),
                userinfo_url: "https://api.github.com/user/emails".to_owned(),
                scopes: vec!["user:email".to_owned()],
            },
            Self::Apple => ProviderEndpoints {
                authorize_url: "https://appleid.apple.com/auth/authorize".to_owned(),
                token_url: "https://appleid.apple.com/auth/token".to_owned(),
                userinfo_url: "https://appleid.apple.com/auth/userinfo".to_owned(),
                scopes: vec!["email".to_owned()],
            },
        }
    }

    /// Extractor that reads the email out of this provider's userinfo body.
    #[must_use]
    pub fn email_extractor(self) -> &'static dyn EmailExtractor {
        match self {
            Self::Google => &GoogleEmail,
            Self::Github => &GithubEmail,
            Self::Apple => &AppleEmail,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for provider names outside [`ProviderKind::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown OAuth2 provider '{0}'")]
pub struct UnknownProviderError(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownProviderError(s.to_owned()))
    }
}

/// Endpoint URLs and scopes of a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: Vec<String>,
}

/// A configured provider: endpoints plus client credentials.
#[derive(Clone)]
pub struct OAuthProvider {
    kind: ProviderKind,
    client_id: String,
    client_secret: Zeroizing<String>,
    endpoints: ProviderEndpoints,
}

impl fmt::Debug for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthProvider")
            .field("kind", &self.kind)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl OAuthProvider {
    /// Provider using its published endpoints.
    pub fn new(kind: ProviderKind, client_id: impl Into<String>, client_secret: Zeroizing<String>) -> Self {
        Self::with_endpoints(kind, client_id, client_secret, kind.endpoints())
    }

    /// Provider with explicit endpoints, used to point tests at local servers.
    pub fn with_endpoints(
        kind: ProviderKind,
        client_id: impl Into<String>,
        client_secret: Zeroizing<String>,
        endpoints: ProviderEndpoints,
    ) -> Self {
        Self {
            kind,
            client_id: client_id.into(),
            client_secret,
            endpoints,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    #[must_use]
    pub fn client_secret(&self) -> &str {
        self.client_secret.as_str()
    }

    #[must_use]
    pub fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }

    /// Scopes joined with spaces as the `scope` parameter expects.
    #[must_use]
    pub fn scope_param(&self) -> String {
        self.endpoints.scopes.join(" ")
    }
}

/// Configured providers keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct ProviderTable {
    providers: BTreeMap<ProviderKind, OAuthProvider>,
}

impl ProviderTable {
    #[must_use]
    pub fn new(providers: impl IntoIterator<Item = OAuthProvider>) -> Self {
        Self {
            providers: providers
                .into_iter()
                .map(|provider| (provider.kind(), provider))
                .collect(),
        }
    }

    /// Look up a provider by its path name; unknown and unconfigured
    /// providers both yield `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OAuthProvider> {
        let kind = ProviderKind::from_str(name).ok()?;
        self.providers.get(&kind)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Configured provider kinds in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.providers.keys().copied()
    }
}

/// Pulls the user's email address out of a provider's userinfo response.
pub trait EmailExtractor: Send + Sync {
    fn extract(&self, userinfo: &Value) -> Option<Email>;
}

/// Google returns a single object with an `email` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleEmail;

impl EmailExtractor for GoogleEmail {
    fn extract(&self, userinfo: &Value) -> Option<Email> {
        email_field(userinfo)
    }
}

/// GitHub returns every address on the account; the primary one wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubEmail;

impl EmailExtractor for GithubEmail {
    fn extract(&self, userinfo: &Value) -> Option<Email> {
        let entries = userinfo.as_array()?;
        entries
            .iter()
            .find(|entry| entry.get("primary").and_then(Value::as_bool) == Some(true))
            .or_else(|| entries.first())
            .and_then(email_field)
    }
}

/// Apple returns an array whose first element carries the email.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppleEmail;

impl EmailExtractor for AppleEmail {
    fn extract(&self, userinfo: &Value) -> Option<Email> {
        userinfo.as_array()?.first().and_then(email_field)
    }
}

fn email_field(value: &Value) -> Option<Email> {
    value
        .get("email")
        .and_then(Value::as_str)
        .and_then(|raw| Email::new(raw).ok())
}

/// Single-use anti-forgery token for the authorization round trip.
#[derive(Clone, PartialEq, Eq)]
pub struct StateToken(String);

impl StateToken {
    /// Number of random bytes behind each token.
    pub const BYTES: usize = 16;

    /// Draw a fresh token from the operating system's CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; Self::BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wrap a token read back from the session.
    #[must_use]
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Compare against the `state` query parameter without short-circuiting
    /// on the first differing byte.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = presented.as_bytes();
        if expected.len() != presented.len() {
            return false;
        }
        expected
            .iter()
            .zip(presented)
            .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
            == 0
    }
}

impl fmt::Debug for StateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateToken(<redacted>)")
    }
}

/// Bearer token returned by the token endpoint. Never logged.
#[derive(Clone)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
