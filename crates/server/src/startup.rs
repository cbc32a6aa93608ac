use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use configs::AppConfig;
use service::auth::AuthConfig;

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Create or promote the configured super admin, if any.
async fn bootstrap_admin(state: &ServerState, cfg: &AppConfig) -> Result<(), StartupError> {
    let (Some(email), Some(password)) = (&cfg.auth.bootstrap_admin_email, &cfg.auth.bootstrap_admin_password) else {
        return Ok(());
    };
    let admin = state
        .auth
        .ensure_super_admin(email, password)
        .await
        .map_err(|e| StartupError::Bootstrap(e.to_string()))?;
    info!(event = "bootstrap_admin_ready", user_id = %admin.id, email = %admin.email);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl_c");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: load config, prepare the database and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "migrations_applied");

    let state = ServerState::new(db, AuthConfig::from_app(&cfg.auth));
    bootstrap_admin(&state, &cfg).await?;

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, event = "listening", "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(event = "stopped", "server stopped");
    Ok(())
}
