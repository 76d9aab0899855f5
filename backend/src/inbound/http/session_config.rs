//! Session cookie configuration.
//!
//! Environment toggles are read through [`mockable::Env`] so every branch can
//! be unit tested. Debug builds fall back to safe defaults with a warning;
//! release builds refuse to start on anything missing or malformed.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

pub(crate) const SECRET_KEY_ENV: &str = "SECRET_KEY";
pub(crate) const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
/// `Key::derive_from` needs at least this much master key material.
pub(crate) const SECRET_KEY_MIN_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SESSION_TTL_HOURS: i64 = 2;

/// Build mode deciding how strict configuration parsing is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates defaults and warns.
    Debug,
    /// Requires explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Mode of the running binary.
    ///
    /// ```rust
    /// use travelmap::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub(crate) fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Settings for the cookie session middleware.
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Whether the cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// Always `Lax`: the provider's redirect back to `/callback` is a
    /// cross-site navigation and must still carry the state token.
    pub same_site: SameSite,
    /// Lifetime of the session cookie.
    pub ttl: CookieDuration,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{name} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        name: &'static str,
        length: usize,
        min_len: usize,
    },
}

/// Build session settings from the environment.
///
/// ```rust
/// use mockable::MockEnv;
/// use travelmap::inbound::http::session_config::{BuildMode, session_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SECRET_KEY" => Some("k".repeat(64)),
///     "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = cookie_secure_from_env(env, mode)?;
    let key = session_key_from_env(env, mode)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site: SameSite::Lax,
        ttl: CookieDuration::hours(SESSION_TTL_HOURS),
    })
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => debug_warn_or_error(
                mode,
                true,
                SessionConfigError::InvalidEnv {
                    name: COOKIE_SECURE_ENV,
                    value: value.clone(),
                    expected: BOOL_EXPECTED,
                },
                || warn!(value = %value, "invalid SESSION_COOKIE_SECURE; defaulting to secure"),
            ),
        },
        None => debug_warn_or_error(
            mode,
            true,
            SessionConfigError::MissingEnv {
                name: COOKIE_SECURE_ENV,
            },
            || warn!("SESSION_COOKIE_SECURE not set; defaulting to secure"),
        ),
    }
}

fn session_key_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let Some(secret) = env.string(SECRET_KEY_ENV).map(Zeroizing::new) else {
        return debug_warn_or_error(
            mode,
            (),
            SessionConfigError::MissingEnv {
                name: SECRET_KEY_ENV,
            },
            || warn!("SECRET_KEY not set; using a temporary session key (dev only)"),
        )
        .map(|()| Key::generate());
    };

    let length = secret.len();
    if length < SECRET_KEY_MIN_LEN {
        return debug_warn_or_error(
            mode,
            (),
            SessionConfigError::KeyTooShort {
                name: SECRET_KEY_ENV,
                length,
                min_len: SECRET_KEY_MIN_LEN,
            },
            || warn!(length, "SECRET_KEY too short; using a temporary session key (dev only)"),
        )
        .map(|()| Key::generate());
    }
    Ok(Key::derive_from(secret.as_bytes()))
}

/// In debug builds run `warn_fn` and return `fallback`; otherwise fail.
pub(crate) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
