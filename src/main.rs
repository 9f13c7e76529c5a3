use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use grokipedia_mcp::config::CONFIG;
use grokipedia_mcp::server;
use grokipedia_mcp::{GrokipediaClient, GrokipediaTools};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: Level = Level::INFO;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[derive(Parser, Debug)]
#[command(name = "grokipedia-mcp", version)]
#[command(about = "MCP server exposing Grokipedia search and page retrieval", long_about = None)]
struct Cli {
    /// Transport mode
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Port to listen on for http mode
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Override GROKIPEDIA_BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override GROKIPEDIA_TIMEOUT_SECS
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn default_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(DEFAULT_LOG_LEVEL).into())
        .parse_lossy("")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout belongs to the stdio transport, so logs go to stderr.
    // The subscriber also picks up `log` records.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter()))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let mut client_config = CONFIG.client_config();
    if let Some(base_url) = cli.base_url {
        client_config = client_config.with_base_url(base_url);
    }
    if let Some(secs) = cli.timeout_secs.filter(|s| *s > 0) {
        client_config = client_config.with_timeout(Duration::from_secs(secs));
    }

    let client = GrokipediaClient::with_config(client_config)?;
    tracing::info!(
        base_url = %client.base_url(),
        timeout_secs = client.timeout().as_secs(),
        transport = ?cli.transport,
        "starting grokipedia-mcp"
    );
    let tools = GrokipediaTools::new(client);

    match cli.transport {
        Transport::Stdio => server::serve_stdio(tools).await,
        Transport::Http => {
            let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
            server::serve_http(tools, addr).await
        }
    }
}
