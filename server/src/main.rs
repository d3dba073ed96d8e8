use std::sync::Arc;

use clap::Parser;
use todo_core::{schema, ScyllaTodoRepository};
use todo_server::config::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    todo_server::logging::configure_logging()?;
    let config = ServerConfig::parse();

    let session = schema::connect(&config.store_config()).await?;
    let repo = ScyllaTodoRepository::new(Arc::new(session)).await?;

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "listening");
    todo_server::run(listener, Arc::new(repo)).await?;
    Ok(())
}
