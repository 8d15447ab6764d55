//! StarPlus Inventory Backend
//!
//! REST backend for the towers, servers, equipment and dashboard cards
//! managed by the StarPlus inventory client.

use starplus_inventory::{api, core, db};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print error to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting StarPlus Inventory Backend v{}", starplus_inventory::VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );
    info!(path = ?config.database.path, "Database configuration");
    if config.security.jwt_secret_generated {
        warn!("No jwt_secret configured; using a random one, sessions end on restart");
    }

    info!("Initializing database...");
    let db = Arc::new(db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size as u32,
        Duration::from_millis(config.database.busy_timeout),
    )?);
    info!(path = %db.path().display(), "Database initialized successfully");

    let state = api::AppState::new(db, &config.security);

    let created = state
        .auth_service
        .ensure_bootstrap_admin(
            &config.security.bootstrap_admin_username,
            &config.security.bootstrap_admin_password,
        )
        .await?;
    if !created {
        info!("User accounts present, skipping bootstrap admin");
    }

    let server_url = format!("http://{}:{}", config.server.host, config.server.port);
    let server = api::ApiServer::with_state(&config, state);
    info!(url = %server_url, "Server ready - starting to serve requests");

    server.serve().await?;

    Ok(())
}
