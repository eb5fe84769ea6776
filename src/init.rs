use anyhow::Context;
use axum::Router;

use crate::{app::build_router, config::AppConfig, store::Store, Data};

async fn init_database(config: &AppConfig) -> anyhow::Result<Store> {
    tracing::info!("initializing database...");

    let store = Store::from_url(&config.database_url)
        .with_context(|| format!("invalid DATABASE_URL: {}", config.database_url))?;

    if let Some(parent) = store
        .filename()
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create database directory {}", parent.display()))?;
    }

    tracing::info!(path = %store.filename().display(), "using database file");

    store
        .migrate()
        .await
        .context("failed to initialize database schema")?;

    Ok(store)
}

pub async fn init(config: &AppConfig) -> anyhow::Result<Router> {
    tracing::info!("initializing... please wait warmly.");

    let store = init_database(config).await?;
    let router = build_router(Data::new(store));

    tracing::info!("finished initializing!");
    Ok(router)
}
