use anyhow::Context;
use clap::Parser;
use tracing::info;

use tax_server::shutdown::shutdown_signal;
use tax_server::{AdminCredentials, AppState, ServerConfig, logging, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = ServerConfig::parse();

    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }
    if let Some(level) = &config.log_level {
        logging::set_log_level(level)?;
    }
    info!(?config, "starting tax server");

    let credentials = AdminCredentials::new(&config.admin_username, &config.admin_password);
    let state = AppState::connect(&config.db_config(), credentials)
        .await
        .with_context(|| format!("failed to open {} repository", config.db_backend))?;

    let (addr, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(config.listen_addr(), shutdown_signal())
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;

    info!(%addr, "listening");
    server.await;
    info!("server stopped");

    Ok(())
}
