mod actions;
mod analyses;
mod common;
mod config;
mod events;
mod routes;
mod videos;

#[cfg(test)]
mod test_helpers;

use crate::config::Config;
use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "match_analysis_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration and environment variables to pass to the application
    let config = Config::from_env()?;

    let db_url = config
        .db_url
        .as_deref()
        .context("Database URL is not configured")?;
    let db: DatabaseConnection = Database::connect(db_url)
        .await
        .context("Could not connect to the database")?;
    tracing::info!("Connected to the database");

    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("DB migrations complete");

    tokio::fs::create_dir_all(&config.videos_root)
        .await
        .with_context(|| format!("Cannot create video root {}", config.videos_root.display()))?;

    tracing::info!(
        app = %config.app_name,
        deployment = %config.deployment.to_uppercase(),
        videos_root = %config.videos_root.display(),
        "Starting server"
    );

    let router = routes::build_router(&db, &config);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
