//! Toolbox Server Entry Point
//!
//! Loads configuration, initializes logging and starts the configured
//! transport.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use toolbox_server::core::{Config, McpServer, TransportService};
use toolbox_server::core::config::LoggingConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment; nothing is logged until the
    // subscriber below is installed.
    let config = Config::from_env()?;

    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);
    config.log_summary();

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config)?;

    info!(
        tools = server.registry().list_tools().len(),
        "Server initialized"
    );

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr: stdout carries MCP frames in stdio mode.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
