//! trackd - Issue tracker REST service
//!
//! Main entry point for the trackd server binary.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use trackd::config::ServerConfig;
use trackd::server::IssueServer;

/// trackd - Minimal project-scoped issue tracker
#[derive(Parser, Debug)]
#[command(name = "trackd")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/trackd/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = trackd::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> trackd::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::load_or_default()?,
    };

    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let server = IssueServer::with_body_limit(config.max_body_size);
    server
        .run(&config.bind_addr())
        .await
        .map_err(|e| trackd::TrackdError::Server(e.to_string()))?;

    Ok(())
}
