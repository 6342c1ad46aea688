use std::sync::Arc;

use anyhow::Context;

use pantry_api::app::{self, services};
use pantry_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    pantry_observability::init_with(config.log_format);

    let services = Arc::new(
        services::build_services(&config)
            .await
            .context("failed to open item collection")?,
    );
    let app = app::build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    let shutdown = services.shutdown_signal().clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_ctrl_c().await;
            shutdown.trigger();
        })
        .await
        .context("server error")?;

    match Arc::try_unwrap(services) {
        Ok(services) => services.into_tracker().shutdown(),
        Err(_) => tracing::warn!("services still shared at shutdown; dropping subscription implicitly"),
    }

    Ok(())
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
