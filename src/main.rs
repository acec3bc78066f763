//! Encore service entry point

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use axum::extract::Request;
use axum::ServiceExt;

use encore::config::Config;
use encore::{build_service, db, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Encore v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::parse();
    info!("Database path: {}", config.database.display());

    let pool = match db::init_database(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {e}");
            return Err(e);
        }
    };

    let state = AppState::new(pool);
    let app = build_service(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Encore listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
