//! Backend entry-point: loads configuration, prepares storage, and serves
//! the REST API with health probes and OpenAPI docs.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use portal_backend::inbound::http::health::HealthState;
use portal_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use portal_backend::outbound::persistence::{DbPool, PoolConfig, apply_migrations};
use portal_backend::settings::PortalSettings;
use server::{ServerConfig, create_server};

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

    let settings = PortalSettings::load()
        .map_err(|err| std::io::Error::other(format!("load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config =
        ServerConfig::new(session, bind_addr).with_sample_courses(settings.seed_sample_courses);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect(database_url, &settings).await?);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::prometheus_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(%bind_addr, "listening");
    server.await
}

/// Migrate the schema, then open the connection pool.
async fn connect(database_url: &str, settings: &PortalSettings) -> std::io::Result<DbPool> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || apply_migrations(&url))
        .await
        .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
        .map_err(std::io::Error::other)?;

    let max_size = settings.pool_max_size().map_err(std::io::Error::other)?;
    DbPool::new(PoolConfig::new(database_url).with_max_size(max_size))
        .await
        .map_err(std::io::Error::other)
}
