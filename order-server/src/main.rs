use anyhow::Context;
use order_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;
    let _log_guard = init_logger_with_file(Some(&config.log_level), config.log_json, config.log_dir.as_deref());

    tracing::info!(
        port = config.http_port,
        database = %config.database_path,
        environment = %config.environment,
        "Order server starting"
    );

    let state = ServerState::initialize(config).await.context("Failed to initialize server state")?;

    Server::new(state).run().await.context("HTTP server error")?;
    Ok(())
}
