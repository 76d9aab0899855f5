//! Server settings loaded via OrthoConfig (`TRAVELMAP_*` variables or CLI).

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use travelmap::inbound::http::auth_config::AuthSettings;
use travelmap::inbound::http::session_config::SessionSettings;
use travelmap::outbound::persistence::DbPool;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "instance";
const DEFAULT_FINANCE_SEED: &str = "finances.json";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080";
const DEFAULT_OAUTH_TIMEOUT_SECS: u64 = 10;

/// Listener, storage and outbound client settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRAVELMAP")]
pub struct ServerSettings {
    /// Socket address to bind.
    pub bind_addr: Option<SocketAddr>,
    /// Directory holding `visited.json`, `links.json` and `finances.json`.
    pub data_dir: Option<PathBuf>,
    /// PostgreSQL URL; when absent the JSON store is used and finance
    /// endpoints report the service as unavailable.
    pub database_url: Option<String>,
    /// Externally visible origin used to build OAuth2 callback URLs.
    pub public_url: Option<String>,
    /// Seed document for `POST /api/mortgage/reload`.
    pub finance_seed: Option<PathBuf>,
    /// Timeout for each call to an identity provider.
    pub oauth_timeout_secs: Option<u64>,
    /// Create empty JSON collections instead of failing when they are missing.
    #[ortho_config(default = false)]
    pub init_data: bool,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            DEFAULT_PORT,
        )))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Configured seed path, or `finances.json` inside the data directory.
    pub fn finance_seed(&self) -> PathBuf {
        self.finance_seed
            .clone()
            .unwrap_or_else(|| self.data_dir().join(DEFAULT_FINANCE_SEED))
    }

    pub fn public_url(&self) -> &str {
        self.public_url.as_deref().unwrap_or(DEFAULT_PUBLIC_URL)
    }

    pub fn oauth_timeout(&self) -> Duration {
        Duration::from_secs(
            self.oauth_timeout_secs
                .unwrap_or(DEFAULT_OAUTH_TIMEOUT_SECS),
        )
    }

    /// Database URL with blank values treated as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Everything `create_server` needs, resolved at startup.
pub struct ServerConfig {
    pub(crate) settings: ServerSettings,
    pub(crate) session: SessionSettings,
    pub(crate) auth: AuthSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(settings: ServerSettings, session: SessionSettings, auth: AuthSettings) -> Self {
        Self {
            settings,
            session,
            auth,
            db_pool: None,
        }
    }

    /// Attach a database pool; repositories switch from the JSON store and
    /// finance fixtures to Diesel.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
