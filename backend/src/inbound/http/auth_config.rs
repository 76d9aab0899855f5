//! Allow-list, bypass and identity provider configuration.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `ALLOWED_EMAIL` | Comma separated addresses allowed past the gate |
//! | `APP_ENV` (`FLASK_ENV`) | `development` or `staging` disables the gate in debug builds |
//! | `{GOOGLE,GITHUB,APPLE}_CLIENT_ID` | Enables the provider |
//! | `{GOOGLE,GITHUB,APPLE}_CLIENT_SECRET` | Client secret for the provider |

use std::sync::Arc;

use mockable::Env;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::session_config::BuildMode;
use crate::domain::{
    AccessPolicy, AllowList, AllowListPolicy, BypassPolicy, OAuthProvider, ProviderKind,
    ProviderTable,
};

pub(crate) const ALLOWED_EMAIL_ENV: &str = "ALLOWED_EMAIL";
pub(crate) const APP_ENV: &str = "APP_ENV";
pub(crate) const LEGACY_APP_ENV: &str = "FLASK_ENV";
const BYPASS_ENVIRONMENTS: [&str; 2] = ["development", "staging"];

/// Resolved authorisation settings.
pub struct AuthSettings {
    /// Policy consulted by the access gate.
    pub policy: Arc<dyn AccessPolicy>,
    /// Identity providers with client credentials.
    pub providers: ProviderTable,
}

/// Errors raised while validating authorisation configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("{name}={value} disables the login gate and is refused in release builds")]
    BypassInRelease { name: &'static str, value: String },
    #[error("{name} is set but {secret} is missing")]
    MissingClientSecret {
        name: String,
        secret: String,
    },
}

/// Build the access policy and provider table from the environment.
///
/// ```rust
/// use mockable::MockEnv;
/// use travelmap::domain::Email;
/// use travelmap::inbound::http::auth_config::auth_settings_from_env;
/// use travelmap::inbound::http::session_config::BuildMode;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "ALLOWED_EMAIL" => Some("john@example.com".to_owned()),
///     _ => None,
/// });
///
/// let settings = auth_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// let john = Email::new("john@example.com").expect("email");
/// assert!(settings.policy.is_authorized(Some(&john)));
/// assert!(settings.providers.is_empty());
/// ```
pub fn auth_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<AuthSettings, AuthConfigError> {
    let policy = access_policy_from_env(env, mode)?;
    let providers = providers_from_env(env, mode)?;
    Ok(AuthSettings { policy, providers })
}

fn access_policy_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Arc<dyn AccessPolicy>, AuthConfigError> {
    if let Some((name, value)) = bypass_environment(env) {
        if !mode.is_debug() {
            return Err(AuthConfigError::BypassInRelease { name, value });
        }
        warn!(variable = name, environment = %value, "login gate disabled");
        return Ok(Arc::new(BypassPolicy));
    }

    let allow_list = env
        .string(ALLOWED_EMAIL_ENV)
        .map(|raw| AllowList::parse(&raw))
        .unwrap_or_default();
    if allow_list.is_empty() {
        warn!("ALLOWED_EMAIL is empty; nobody can pass the login gate");
    } else {
        info!(entries = allow_list.len(), "allow-list loaded");
    }
    Ok(Arc::new(AllowListPolicy::new(allow_list)))
}

/// The variable requesting a bypass and its normalised value, if any.
fn bypass_environment<E: Env>(env: &E) -> Option<(&'static str, String)> {
    let (name, raw) = env
        .string(APP_ENV)
        .map(|value| (APP_ENV, value))
        .or_else(|| env.string(LEGACY_APP_ENV).map(|value| (LEGACY_APP_ENV, value)))?;
    let value = raw.trim().to_ascii_lowercase();
    BYPASS_ENVIRONMENTS
        .contains(&value.as_str())
        .then_some((name, value))
}

fn providers_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<ProviderTable, AuthConfigError> {
    let mut providers = Vec::new();
    for kind in ProviderKind::ALL {
        let id_name = format!("{}_CLIENT_ID", kind.env_prefix());
        let secret_name = format!("{}_CLIENT_SECRET", kind.env_prefix());
        let Some(client_id) = env.string(&id_name).filter(|id| !id.trim().is_empty()) else {
            continue;
        };
        let Some(secret) = env.string(&secret_name).map(Zeroizing::new) else {
            if mode.is_debug() {
                warn!(provider = %kind, "client secret missing; provider disabled");
                continue;
            }
            return Err(AuthConfigError::MissingClientSecret {
                name: id_name,
                secret: secret_name,
            });
        };
        providers.push(OAuthProvider::new(kind, client_id.trim(), secret));
    }
    let table = ProviderTable::new(providers);
    info!(
        providers = ?table.kinds().map(ProviderKind::as_str).collect::<Vec<_>>(),
        "identity providers configured"
    );
    Ok(table)
}
