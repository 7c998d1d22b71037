//! NasriChat registration server - Entry Point
//!
//! Starts the TCP listener and RegistrationServer actor, loads the country
//! dataset in the background, and accepts connections.

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nasrichat_server::{
    handle_connection, load_countries, RegistrationServer, ServerCommand, ServerConfig,
};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=nasrichat_server=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nasrichat_server=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Registration server listening on {}", config.bind_addr);

    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let server = RegistrationServer::new(cmd_rx).with_suggestion_limit(config.suggestion_limit);
    tokio::spawn(server.run());

    info!("RegistrationServer actor started");

    // Load the dataset without holding up connections
    let loader_tx = cmd_tx.clone();
    let countries_path = config.countries_path.clone();
    tokio::spawn(async move {
        let countries = load_countries(countries_path.as_deref()).await;
        if loader_tx
            .send(ServerCommand::CountriesLoaded { countries })
            .await
            .is_err()
        {
            error!("Server closed before the country list was loaded");
        }
    });

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
