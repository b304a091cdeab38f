//! Roster server entry point: loads settings, prepares the database when one
//! is configured, and serves the HTTP API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roster::inbound::http::health::HealthState;
use roster::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, ServerSettings, create_server};

async fn attach_database(
    config: ServerConfig,
    database_url: &str,
) -> std::io::Result<ServerConfig> {
    let migration_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;
    info!("using PostgreSQL stores");
    Ok(config.with_db_pool(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let mut config = ServerConfig::from_settings(&settings).map_err(std::io::Error::other)?;

    match settings.database_url() {
        Some(url) => config = attach_database(config, url).await?,
        None => warn!("ROSTER_DATABASE_URL not set; records live in memory only"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
