use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::env::ensure_upload_dir;
use configs::AppConfig;
use migration::MigratorTrait;
use service::auth::token::DEFAULT_TTL_SECS;
use service::auth::TokenService;
use service::storage::memory::MemoryStore;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use crate::uploads::ImageStore;

/// Resolve the bind address from the validated server section.
fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Connect the configured backend (running migrations for PostgreSQL) and
/// assemble handler state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let tokens = TokenService::new(&cfg.auth.jwt_secret, DEFAULT_TTL_SECS);
    let images = ImageStore::from_config(&cfg.uploads);

    if cfg.database.is_in_memory() {
        warn!("using in-memory store; data is lost on restart");
        return Ok(AppState::in_memory(Arc::new(MemoryStore::new()), tokens, images));
    }

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");
    Ok(AppState::seaorm(db, tokens, images))
}

/// Serve with an already validated configuration.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    if cfg.auth.uses_dev_secret() {
        warn!("JWT_KEY not set; using the development signing secret");
    }
    ensure_upload_dir(&cfg.uploads.dir).await?;

    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, routes::build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting places api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
