use clap::Parser;
use std::process;
use std::sync::Arc;

use ekilex_mcp::api::EkilexClient;
use ekilex_mcp::config::{Config, ConfigArgs, TransportKind};
use ekilex_mcp::logging;
use ekilex_mcp::mcp::{http, McpServer};
use tracing::info;

/// MCP server for the Ekilex Estonian dictionary API.
#[derive(Parser)]
#[command(
    name = "ekilex-mcp",
    version,
    about = "MCP server for the Ekilex Estonian dictionary API"
)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_args(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    logging::init(config.log_level);

    if let Err(e) = run(config).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(config: Config) -> ekilex_mcp::errors::Result<()> {
    info!(
        transport = %config.transport,
        base_url = %config.base_url,
        "starting ekilex-mcp v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(EkilexClient::from_config(&config));
    let server = Arc::new(McpServer::new(client));

    match config.transport {
        TransportKind::Stdio => server.run_stdio().await,
        TransportKind::Http => http::serve(server, &config).await,
    }
}
