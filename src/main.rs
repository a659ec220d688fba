use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use usdcode_mcp::{AskUsdcodeUseCase, UsdcodeClient, UsdcodeMcpServer};

#[derive(Parser)]
#[command(name = "usdcode-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    // Logs go to stderr: stdout carries the MCP stdio transport
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let Some(client) = UsdcodeClient::from_env() else {
        error!("Missing NVIDIA_API_KEY. Set it in your environment before starting the server.");
        std::process::exit(1);
    };

    let use_case = Arc::new(AskUsdcodeUseCase::new(Arc::new(client)));
    let server = UsdcodeMcpServer::new(use_case);

    info!("Starting USDCode MCP server on stdio");
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
