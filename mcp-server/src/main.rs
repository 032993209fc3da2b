//! Folio MCP Server
//!
//! This MCP server lets AI agents read the Folio feed over the API.
//! It exposes tools for:
//! - Opening a feed session
//! - Loading more items
//! - Refreshing and viewing the feed

mod client;
mod server;

use anyhow::Result;
use rmcp::ServiceExt;
use server::FolioServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Folio MCP server");

    let server = FolioServer::from_env()?;

    // Serve over stdio - pass as tuple (stdin, stdout)
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;

    // Wait for shutdown
    service.waiting().await?;

    Ok(())
}
