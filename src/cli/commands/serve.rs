use anyhow::Context;
use std::path::PathBuf;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::state::AppState;

pub async fn handle(config: AppConfig, seed: Option<PathBuf>) -> anyhow::Result<()> {
    let tokens = TokenService::from_config(&config.security)?;
    let store = crate::database::connect(&config.database)
        .await
        .context("failed to open the document store")?;

    if let Some(path) = seed {
        let fixture = super::seed::read_fixture(&path).await?;
        let (genres, dramas) = super::seed::load(store.as_ref(), &fixture).await?;
        tracing::info!("Seeded {} genres and {} dramas from {}", genres, dramas, path.display());
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let app = crate::app(AppState::new(store, tokens, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
