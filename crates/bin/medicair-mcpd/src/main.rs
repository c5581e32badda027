//! Daemon entry point for the MedicAir MCP server.
//!
//! Loads configuration from the environment, opens the DuckDB or
//! MotherDuck connection, and serves the MCP protocol over stdio
//! and/or streamable HTTP.

mod config;

use medicair_db::DatabaseClient;
use medicair_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use medicair_mcp::widget::WidgetStore;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

// Logs go to stderr: stdout belongs to the MCP stdio transport.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();
    let config = ServerConfig::from_args()?;

    let db = DatabaseClient::connect(&config.database_config())?;
    let widgets = WidgetStore::new(config.widget_dir.clone());

    if config.http_serve {
        let http_config = McpHttpServerConfig::new(config.mcp_http_addr);
        tracing::info!(addr = %http_config.addr, "serving MCP over streamable HTTP");
        if config.enable_stdio {
            let http_db = db.clone();
            let http_widgets = widgets.clone();
            tokio::spawn(async move {
                if let Err(err) = serve_streamable_http(http_db, http_widgets, http_config).await {
                    tracing::error!(error = %err, "streamable HTTP server exited");
                }
            });
        } else {
            serve_streamable_http(db, widgets, http_config).await?;
            return Ok(());
        }
    }

    tracing::info!("serving MCP over stdio");
    serve_stdio(db, widgets).await?;
    Ok(())
}
