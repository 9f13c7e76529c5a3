use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use rmcp::ServiceExt;
use rmcp::transport::StreamableHttpServerConfig;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, tower::StreamableHttpService,
};
use tower_http::cors::{Any, CorsLayer};

use crate::tools::GrokipediaTools;

pub const MCP_PATH: &str = "/mcp";

/// Serve the tools over stdin/stdout until the peer disconnects.
pub async fn serve_stdio(tools: GrokipediaTools) -> Result<()> {
    log::info!("serving grokipedia tools over stdio");
    let running = tools
        .serve(stdio())
        .await
        .context("failed to start stdio transport")?;
    let reason = running.waiting().await?;
    log::info!("stdio session ended: {reason:?}");
    Ok(())
}

pub fn create_router(tools: GrokipediaTools) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let service = StreamableHttpService::new(
        move || Ok(tools.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    Router::new().nest_service(MCP_PATH, service).layer(cors)
}

/// Serve the tools over streamable HTTP at `addr`, until ctrl-c.
pub async fn serve_http(tools: GrokipediaTools, addr: SocketAddr) -> Result<()> {
    let router = create_router(tools);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("serving grokipedia tools on http://{addr}{MCP_PATH}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
