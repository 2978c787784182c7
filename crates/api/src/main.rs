use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use tasktrack_api::app::{build_app, AppServices};
use tasktrack_api::config::ApiConfig;
use tasktrack_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tasktrack_observability::init(LogFormat::from_env());

    let config = ApiConfig::from_env().context("invalid configuration")?;
    info!(?config, "starting");

    let services = AppServices::build(&config).context("failed to initialise services")?;
    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
