//! Trellis - i3/Sway window manager MCP server
//!
//! Connects to the running window manager over its IPC socket and serves the
//! MCP tool surface on stdio.

use rmcp::transport::io::stdio;
use rmcp::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trellis::server::TrellisServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr to keep stdout clean for MCP protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Trellis MCP server");

    // Connect to the window manager; the server constructor probes the
    // version so an unreachable window manager aborts startup here.
    let gateway = trellis::gateway::connect().await?;
    let server = TrellisServer::new(gateway).await?;

    // Run with stdio transport
    let transport = stdio();

    tracing::info!("Trellis MCP server ready, listening on stdio");

    let service = server.serve(transport).await?;

    // Wait for graceful shutdown
    service.waiting().await?;

    tracing::info!("Trellis MCP server shutting down");
    Ok(())
}
