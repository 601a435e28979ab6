//! Shanti Himalaya API Server
//!
//! Main entry point for the resort backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shanti_api::{AppState, create_router};
use shanti_core::storage::{InlineEncoder, R2Client, R2Config, UploadService};
use shanti_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shanti=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Create storage client and upload service
    let r2_config = R2Config::from(&config.storage);
    let client = R2Client::new(r2_config).context("Failed to create R2 client")?;
    info!(
        account_id = %config.storage.account_id,
        bucket = %config.storage.bucket_name,
        public_url = %config.storage.public_url,
        "Object storage configured"
    );

    let uploads = UploadService::new(Arc::new(client), InlineEncoder::new())
        .with_placeholder_marker(config.storage.placeholder_marker.clone());

    // Create application state
    let state = AppState {
        uploads: Arc::new(uploads),
        max_upload_bytes: config.storage.max_upload_bytes,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
