//! Structree HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! STRUCTREE_JWT_SECRET=change-me cargo run --bin structree-server
//! ```
//!
//! # Environment Variables
//!
//! Variables may also come from a `.env` file in the working directory.
//!
//! - `STRUCTREE_JWT_SECRET`: HS256 secret for bearer tokens (required)
//! - `STRUCTREE_DATABASE_PATH`: Database file (default: ./data/structree.db)
//! - `STRUCTREE_BIND_ADDR`: Listen address (default: 127.0.0.1)
//! - `STRUCTREE_PORT`: Server port (default: 3001)
//! - `CORS_ALLOW_ORIGIN`: Allowed browser origin
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use structree_server::{start_server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(?config, "Starting Structree server");

    start_server(config).await
}
