use std::sync::Arc;

use anyhow::Context;

use shopcart_api::{AppConfig, AppServices, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    shopcart_observability::init(config.log_format);

    let services = AppServices::from_config(&config)
        .await
        .context("failed to initialize stores")?;
    let app = build_app(&config, Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(
        require_auth = config.require_auth,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
