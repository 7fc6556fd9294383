//! MCP Server Entry Point
//!
//! Parses the command line, loads configuration, builds the tools from the
//! OpenAPI document and starts the server with the configured transport.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use openapi_mcp_server::core::{Config, Overrides, TransportService, build_server};

/// Serve the operations of an OpenAPI 3.x document as MCP tools.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// OpenAPI document: file path or http(s) URL (env: MCP_OPENAPI_SPEC)
    spec: Option<String>,

    /// Base URL for API calls (env: MCP_API_BASE_URL or BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (env: MCP_API_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<u64>,

    /// Register the example `ping` tool (env: MCP_PING_TOOL)
    #[arg(long)]
    ping: bool,

    /// Log level: trace, debug, info, warn or error (env: MCP_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Self {
            spec: cli.spec,
            base_url: cli.base_url,
            timeout_secs: cli.timeout,
            ping_tool: cli.ping,
            log_level: cli.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment first, then command-line overrides
    let config = Config::from_env().with_overrides(cli.into());

    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let transport = TransportService::new(config.transport.clone());
    let server = build_server(config)
        .await
        .context("failed to initialize server")?;

    info!("Server initialized");

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout is reserved for the STDIO transport.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
