//! Light Archive MCP Server
//!
//! Model Context Protocol server exposing the Light Archive knowledge base
//! (search, CRUD, related archives, image upload, AI writing helpers).

mod format;
mod params;
mod protocol;
mod server;
mod stdio;
mod tools;

use std::net::SocketAddr;

use tracing::info;

use light_archive_common::{config::Transport, Config};

use server::McpServer;
use stdio::StdioServer;
use tools::Services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("light_archive_mcp=debug".parse()?)
                .add_directive("light_archive_common=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!("Starting Light Archive MCP server");

    let config = Config::load_or_default();
    info!(
        supabase_configured = config.supabase.is_configured(),
        openai_configured = config.openai.is_configured(),
        transport = ?config.mcp.transport,
        "Configuration loaded"
    );

    let services = Services::from_config(&config);

    if let Some(store) = &services.store {
        match store.health_check().await {
            Ok(true) => info!("Supabase connection established"),
            Ok(false) => tracing::error!("Supabase health check returned false"),
            Err(e) => tracing::error!(error = %e, "Supabase connection failed - continuing anyway"),
        }
    }

    match config.mcp.transport {
        Transport::Stdio => {
            info!("Serving MCP over stdio");
            StdioServer::new(services).run().await?;
        }
        Transport::Http => {
            let addr = SocketAddr::new(
                config.mcp.host.parse().unwrap_or([127, 0, 0, 1].into()),
                config.mcp.port,
            );

            info!(address = %addr, "Light Archive MCP server listening");
            McpServer::new(services).run(addr).await?;
        }
    }

    info!("Light Archive MCP server stopped");
    Ok(())
}
