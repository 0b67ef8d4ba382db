//! OSRS Wiki MCP server entry point

use clap::{Parser, Subcommand};
use osrs_wiki_mcp::server::transport::{self, TransportMode};
use osrs_wiki_mcp::{AppConfig, OsrsWikiServer};
use rust_mcp_sdk::schema::ContentBlock;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "osrs-wiki-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for the Old School RuneScape wiki", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Transport mode [stdio, http, sse, hybrid]
        #[arg(short, long)]
        mode: Option<String>,

        /// Listen host
        #[arg(long)]
        host: Option<String>,

        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a default config file
    Config {
        /// Output path
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run one tool call and print its output
    Test {
        /// Tool to run [search, summary, getPlayerData]
        #[arg(short, long, default_value = "search")]
        tool: String,

        /// Search query (search)
        #[arg(long)]
        query: Option<String>,

        /// Page title (summary)
        #[arg(long)]
        title: Option<String>,

        /// RuneLite username (getPlayerData)
        #[arg(long)]
        username: Option<String>,

        /// Result limit (search)
        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        limit: i64,

        /// Bypass the player data cache (getPlayerData)
        #[arg(long)]
        force_refresh: bool,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { mode, host, port } => {
            serve_command(&cli.config, cli.debug, mode, host, port).await?;
        }
        Commands::Config { output, force } => {
            config_command(&output, force)?;
        }
        Commands::Test {
            tool,
            query,
            title,
            username,
            limit,
            force_refresh,
        } => {
            let arguments = match tool.as_str() {
                "search" => serde_json::json!({
                    "query": query.ok_or("search requires --query")?,
                    "limit": limit,
                }),
                "summary" => serde_json::json!({
                    "title": title.ok_or("summary requires --title")?,
                }),
                "getPlayerData" => serde_json::json!({
                    "username": username,
                    "forceRefresh": force_refresh,
                }),
                _ => return Err(format!("Unknown tool: {tool}").into()),
            };
            test_command(&cli.config, cli.debug, &tool, arguments).await?;
        }
        Commands::Version => {
            version_command();
        }
    }

    Ok(())
}

/// Start the server
async fn serve_command(
    config_path: &Path,
    debug: bool,
    mode: Option<String>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;

    // Flags only override when given explicitly
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }
    if let Some(m) = mode {
        config.server.transport_mode = m;
    }
    if debug {
        config.logging.level = "debug".to_string();
    }

    config
        .validate()
        .map_err(|e| format!("Config validation failed: {e}"))?;

    osrs_wiki_mcp::init_logging_with_config(&config.logging)
        .map_err(|e| format!("Failed to initialize logging: {e}"))?;

    tracing::info!("Starting OSRS Wiki MCP server v{}", env!("CARGO_PKG_VERSION"));
    if !config_path.exists() {
        tracing::warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
    }

    let mode: TransportMode = config.server.transport_mode.parse()?;
    let server = OsrsWikiServer::new(config).map_err(|e| format!("Failed to create server: {e}"))?;

    tracing::info!(%mode, "Using transport");
    transport::run_server_with_mode(&server, mode)
        .await
        .map_err(|e| format!("Server stopped with error: {e}"))?;

    Ok(())
}

/// File config (or defaults) with environment overrides
fn load_config(config_path: &Path) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = if config_path.exists() {
        AppConfig::from_file(config_path).map_err(|e| format!("Failed to load config: {e}"))?
    } else {
        AppConfig::default()
    };

    config.apply_env()?;
    Ok(config)
}

/// Write a default config file
fn config_command(output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!(
            "Config file already exists: {}, use --force to overwrite",
            output.display()
        )
        .into());
    }

    AppConfig::default()
        .save_to_file(output)
        .map_err(|e| format!("Failed to save config: {e}"))?;

    println!("Config file written: {}", output.display());
    Ok(())
}

/// Run a single tool call against the live upstreams
async fn test_command(
    config_path: &Path,
    debug: bool,
    tool: &str,
    arguments: serde_json::Value,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if debug {
        config.logging.level = "debug".to_string();
    }
    config.logging.enable_file = false;
    osrs_wiki_mcp::init_logging_with_config(&config.logging)?;

    let server = OsrsWikiServer::new(config)?;
    let result = server
        .tool_registry()
        .execute_tool(tool, arguments)
        .await
        .map_err(|e| format!("Tool call failed: {e}"))?;

    for content in &result.content {
        match content {
            ContentBlock::TextContent(text_content) => println!("{}", text_content.text),
            other => println!("Non-text content: {other:?}"),
        }
    }

    Ok(())
}

fn version_command() {
    println!("OSRS Wiki MCP server v{}", env!("CARGO_PKG_VERSION"));
    println!("Built: {}", env!("BUILD_TIMESTAMP"));
    println!("Git commit: {}", env!("GIT_COMMIT"));
    println!("Rust: {}", env!("RUST_VERSION"));
}
