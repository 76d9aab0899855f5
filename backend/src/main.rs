//! Backend entry-point: loads configuration, prepares storage and runs the
//! HTTP server.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use travelmap::inbound::http::auth_config::auth_settings_from_env;
use travelmap::inbound::http::health::HealthState;
use travelmap::inbound::http::session_config::{BuildMode, session_settings_from_env};
use travelmap::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|error| eyre!("failed to load server settings: {error}"))?;
    let mode = BuildMode::from_debug_assertions();
    let env = DefaultEnv::new();
    let session =
        session_settings_from_env(&env, mode).wrap_err("invalid session configuration")?;
    let auth = auth_settings_from_env(&env, mode).wrap_err("invalid login configuration")?;

    let mut config = ServerConfig::new(settings.clone(), session, auth);
    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("database migrations failed")?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    } else {
        info!(data_dir = %settings.data_dir().display(), "no database configured; using JSON store");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated with an error")
}
