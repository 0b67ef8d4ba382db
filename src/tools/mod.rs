//! MCP tools module
//!
//! Provides the OSRS wiki and WikiSync tools.

pub mod player;
pub mod wiki;

use crate::client::{ApiResponse, HttpFetch};
use crate::error::ToolError;
use async_trait::async_trait;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult, Tool as McpTool};
use std::sync::Arc;
use url::Url;

/// Tool trait
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool definition
    fn definition(&self) -> McpTool;

    /// Execute tool
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError>;
}

/// Tool registry
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    #[must_use]
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register tool
    #[must_use]
    pub fn register<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Get all tool definitions
    #[must_use]
    pub fn get_tools(&self) -> Vec<McpTool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Execute tool
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        for tool in &self.tools {
            if tool.definition().name == name {
                tracing::debug!(tool = name, "executing tool");
                return tool.execute(arguments).await;
            }
        }

        tracing::warn!(tool = name, "unknown tool requested");
        Err(CallToolError::unknown_tool(name.to_string()))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create default tool registry
#[must_use]
pub fn create_default_registry(
    wiki: &Arc<wiki::WikiService>,
    player: &Arc<player::PlayerDataService>,
) -> ToolRegistry {
    ToolRegistry::new()
        .register(wiki::search::SearchToolImpl::new(wiki.clone()))
        .register(wiki::summary::SummaryToolImpl::new(wiki.clone()))
        .register(player::lookup::GetPlayerDataToolImpl::new(player.clone()))
}

/// GET `url` and map every non-JSON outcome to its [`ToolError`]
pub(crate) async fn fetch_json(
    fetcher: &dyn HttpFetch,
    url: Url,
) -> std::result::Result<serde_json::Value, ToolError> {
    match fetcher.get_json(url).await {
        Ok(ApiResponse::Success(body)) => Ok(body),
        Ok(ApiResponse::Status(status)) => Err(ToolError::Status(status)),
        Err(e) => {
            tracing::warn!(error = %e, "upstream request failed");
            Err(ToolError::exception(&e))
        }
    }
}

/// Wrap tool text in a single text content block
pub(crate) fn text_result(content: String) -> CallToolResult {
    CallToolResult::text_content(vec![content.into()])
}
