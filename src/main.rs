//! Multi-Room WebSocket Broadcast Server - Entry Point
//!
//! Constructs the naming service and the seeded room directory, binds
//! the directory under its well-known name, and accepts connections.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use roomcast::{handle_connection, InMemoryNaming, NamingService, RoomDirectory, DIRECTORY_NAME};

/// Default server address
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=roomcast=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roomcast=info")),
        )
        .init();

    // Get bind address from command line or use default
    let addr = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    // Construct the naming service and the directory, seeded with its
    // default room, then make the directory reachable by name.
    let naming: Arc<dyn NamingService> = Arc::new(InMemoryNaming::new());
    let directory = Arc::new(RoomDirectory::new(Arc::clone(&naming))?);
    naming.bind_directory(DIRECTORY_NAME, directory)?;

    info!("Room directory bound as '{}'", DIRECTORY_NAME);

    // Start TCP listener
    let listener = TcpListener::bind(&addr).await?;
    info!("WebSocket broadcast server listening on {}", addr);

    // Connection accept loop
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let naming = Arc::clone(&naming);

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, naming).await {
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
