//! MCP Server Entry Point
//!
//! Loads configuration from the environment, applies command-line
//! overrides, initializes logging and starts the selected transport.

use anyhow::{Result, bail};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use api_toolbox_mcp_server::core::{Config, McpServer, Suite, TransportConfig, TransportService};

#[derive(Parser, Debug)]
#[command(version, about)]
/// MCP server exposing REST API wrappers as tools
struct Args {
    /// Transport to serve on (stdio, sse, http, tcp)
    #[arg(long)]
    transport: Option<String>,

    /// Bind host for network transports
    #[arg(long)]
    host: Option<String>,

    /// Bind port for network transports
    #[arg(long)]
    port: Option<u16>,

    /// Comma-separated tool suites to enable, or `all`
    #[arg(long)]
    suites: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::from_env();
    apply_args(&mut config, args)?;

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        "Tool suites: {}",
        config
            .tools
            .suites
            .iter()
            .map(Suite::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let server = McpServer::new(config.clone());
    info!("Server initialized with {} tools", server.registry().len());

    TransportService::new(config.transport).run(server).await?;

    info!("Server shutting down");
    Ok(())
}

fn apply_args(config: &mut Config, args: Args) -> Result<()> {
    if let Some(name) = args.transport {
        match TransportConfig::from_name(&name) {
            Some(transport) => config.transport = transport,
            None => bail!(
                "unknown transport '{}' (available: {})",
                name,
                TransportConfig::available().join(", ")
            ),
        }
    }
    if let Some(host) = args.host {
        config.transport.set_host(host);
    }
    if let Some(port) = args.port {
        config.transport.set_port(port);
    }
    if let Some(list) = args.suites {
        config.tools.suites = Suite::parse_list(&list).map_err(anyhow::Error::msg)?;
    }
    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries STDIO protocol traffic.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
