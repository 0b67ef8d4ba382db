//! Wiki search tool
#![allow(missing_docs)]

use super::WikiService;
use crate::error::ToolError;
use crate::tools::{fetch_json, text_result, Tool};
use crate::utils::{limit, string};
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::Arc;

/// Search tool parameters
#[macros::mcp_tool(
    name = "search",
    title = "Search the OSRS Wiki",
    description = "Search the Old School RuneScape wiki. Returns matching page titles with a short snippet and a link to each page.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = true,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchTool {
    /// Search query
    #[json_schema(
        title = "Search query",
        description = "Search query, for example: dragon scimitar, Zulrah, quest point cape"
    )]
    pub query: String,

    /// Result limit
    #[json_schema(
        title = "Result limit",
        description = "Number of results to return (1-50)",
        minimum = 1,
        maximum = 50,
        default = 10
    )]
    pub limit: Option<i64>,
}

/// One search hit as returned by `list=search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub snippet_html: String,
}

impl WikiService {
    /// Search the wiki and render the hits as text.
    ///
    /// Never fails: every problem is rendered into the returned text.
    pub async fn search(&self, query: &str, limit: i64) -> String {
        self.try_search(query, limit)
            .await
            .unwrap_or_else(|e| e.to_string())
    }

    /// Search the wiki, keeping the failure reason tagged
    pub async fn try_search(&self, query: &str, limit: i64) -> Result<String, ToolError> {
        if string::is_blank(query) {
            return Err(ToolError::MissingInput("query"));
        }

        let limit = limit::clamp(limit);
        let srlimit = limit.to_string();
        let url = self.query_url(&[
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", &srlimit),
        ]);

        tracing::debug!(query, limit, "searching wiki");
        let body = fetch_json(self.fetcher(), url).await?;

        let hits = parse_search_response(&body);
        if hits.is_empty() {
            return Err(ToolError::NoResults);
        }

        Ok(self.format_search_results(&hits, limit))
    }

    fn format_search_results(&self, hits: &[SearchHit], limit: u32) -> String {
        let mut output = format!("📊 Results: {} (showing up to {limit})\n", hits.len());

        for (i, hit) in hits.iter().enumerate() {
            write!(output, "\n{}. {}", i + 1, hit.title).unwrap();

            let snippet = string::clean_snippet(&hit.snippet_html);
            if !string::is_blank(&snippet) {
                write!(output, "\n   - {snippet}").unwrap();
            }

            write!(output, "\n   - {}", self.page_url(&hit.title)).unwrap();
        }

        output
    }
}

/// Read `query.search` from a search response; anything missing is empty
fn parse_search_response(json: &serde_json::Value) -> Vec<SearchHit> {
    json.get("query")
        .and_then(|q| q.get("search"))
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| SearchHit {
                    title: item
                        .get("title")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    snippet_html: item
                        .get("snippet")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Search tool implementation
pub struct SearchToolImpl {
    service: Arc<WikiService>,
}

impl SearchToolImpl {
    #[must_use]
    pub fn new(service: Arc<WikiService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        SearchTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: SearchTool = serde_json::from_value(arguments).map_err(|e| {
            CallToolError::invalid_arguments("search", Some(format!("Failed to parse arguments: {e}")))
        })?;

        let content = self
            .service
            .search(&params.query, params.limit.unwrap_or(limit::DEFAULT))
            .await;

        Ok(text_result(content))
    }
}
