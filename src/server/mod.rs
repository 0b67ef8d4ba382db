//! Server module
//!
//! Provides the MCP server implementation with multiple transport protocols.

pub mod handler;
pub mod transport;

use crate::cache::Cache;
use crate::client::{HttpClientBuilder, HttpFetch};
use crate::config::AppConfig;
use crate::error::Result;
use crate::tools::player::PlayerDataService;
use crate::tools::wiki::WikiService;
use crate::tools::ToolRegistry;
use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ProtocolVersion, ServerCapabilities,
    ServerCapabilitiesTools,
};
use std::sync::Arc;

/// MCP server
#[derive(Clone)]
pub struct OsrsWikiServer {
    config: AppConfig,
    tool_registry: Arc<ToolRegistry>,
    wiki: Arc<WikiService>,
    player: Arc<PlayerDataService>,
}

impl OsrsWikiServer {
    /// Create a new server instance talking to the configured upstreams
    pub fn new(config: AppConfig) -> Result<Self> {
        let fetcher = HttpClientBuilder::new()
            .user_agent(config.wiki.user_agent.clone())
            .timeout(config.wiki.request_timeout())
            .build_fetcher()?;

        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Create a server instance with a caller-supplied HTTP fetcher
    pub fn with_fetcher(config: AppConfig, fetcher: Arc<dyn HttpFetch>) -> Result<Self> {
        let cache: Arc<dyn Cache> = Arc::from(crate::cache::create_cache());

        let wiki = Arc::new(WikiService::new(fetcher.clone(), &config.wiki)?);
        let player = Arc::new(PlayerDataService::new(
            fetcher,
            cache,
            config.cache.ttl(),
            &config.wiki,
        )?);

        let tool_registry = Arc::new(crate::tools::create_default_registry(&wiki, &player));

        Ok(Self {
            config,
            tool_registry,
            wiki,
            player,
        })
    }

    /// Get server configuration
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get tool registry
    #[must_use]
    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Get wiki service
    #[must_use]
    pub fn wiki(&self) -> &Arc<WikiService> {
        &self.wiki
    }

    /// Get player data service
    #[must_use]
    pub fn player(&self) -> &Arc<PlayerDataService> {
        &self.player
    }

    /// Get server information
    #[must_use]
    pub fn server_info(&self) -> InitializeResult {
        InitializeResult {
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                title: Some("OSRS Wiki MCP Server".to_string()),
                description: self.config.server.description.clone(),
                icons: vec![],
                website_url: Some("https://oldschool.runescape.wiki".to_string()),
            },
            capabilities: ServerCapabilities {
                tools: Some(ServerCapabilitiesTools { list_changed: None }),
                resources: None,
                prompts: None,
                experimental: None,
                completions: None,
                logging: None,
                tasks: None,
            },
            protocol_version: ProtocolVersion::V2025_11_25.into(),
            instructions: Some(
                "Use this server to search the Old School RuneScape wiki, read page summaries and fetch WikiSync player data."
                    .to_string(),
            ),
            meta: None,
        }
    }

    /// Run Stdio server
    pub async fn run_stdio(&self) -> Result<()> {
        transport::run_stdio_server(self).await
    }

    /// Run HTTP server
    pub async fn run_http(&self) -> Result<()> {
        transport::run_http_server(self).await
    }

    /// Run SSE server
    pub async fn run_sse(&self) -> Result<()> {
        transport::run_sse_server(self).await
    }
}
