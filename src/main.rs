use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use parlor::config::load_config;
use parlor::registry::ClientRegistry;
use parlor::transport::tcp::run_server;
use parlor::users::UserStore;
use parlor::utils;
use parlor::utils::error::ServerError;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let settings = load_config()?;
    utils::logging::init(&settings.log.level);

    let registry = Arc::new(ClientRegistry::new());
    let users = Arc::new(UserStore::new());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;

    // Port 0 lets the OS pick; either way, tell clients where to connect.
    info!("chat server listening on {}", listener.local_addr()?);

    run_server(listener, registry, users).await;
    Ok(())
}
