//! # SpeakSpace
//!
//! Participation tracking service for group discussion and interview
//! practice sessions.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - HTTP server

use anyhow::Result;
use tracing::info;

use speakspace::config::Settings;
use speakspace::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    speakspace::telemetry::init_tracing();

    info!("Starting SpeakSpace...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
