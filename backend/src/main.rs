//! Backend entry-point: loads settings, migrates the schema and serves the API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use bloglist::domain::UpdatePolicy;
use bloglist::inbound::http::health::HealthState;
use bloglist::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use bloglist::settings::AppSettings;
use server::{ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!(error = %err, "{context}");
    io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| startup_error("failed to load settings", e))?;
    settings
        .validate()
        .map_err(|e| startup_error("invalid settings", e))?;
    info!(
        fingerprint = %settings.secret_fingerprint(),
        "token signing secret loaded"
    );

    let update_policy = UpdatePolicy::from_enforcement(settings.enforce_update_ownership);
    if update_policy == UpdatePolicy::AnyAuthenticated {
        warn!(
            "any authenticated user may update any blog; \
             set BLOGLIST_ENFORCE_UPDATE_OWNERSHIP=true to restrict updates to the creator"
        );
    }

    run_pending_migrations(&settings.database_url)
        .await
        .map_err(|e| startup_error("database migration failed", e))?;

    let pool_config = PoolConfig::new(settings.database_url.clone())
        .with_max_size(settings.db_max_connections());
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| startup_error("failed to build database pool", e))?;

    let config = ServerConfig::new(
        settings.bind_addr(),
        pool,
        Zeroizing::new(settings.secret.clone().into_bytes()),
    )
    .with_token_ttl(settings.token_ttl())
    .with_update_policy(update_policy);

    info!(addr = %settings.bind_addr(), "starting HTTP server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
