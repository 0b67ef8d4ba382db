//! Page summary tool
#![allow(missing_docs)]

use super::WikiService;
use crate::error::ToolError;
use crate::tools::{fetch_json, text_result, Tool};
use crate::utils::string;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Summary tool parameters
#[macros::mcp_tool(
    name = "summary",
    title = "OSRS Wiki Page Summary",
    description = "Get the plain-text introduction of an Old School RuneScape wiki page, with a link to the full article.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = true,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct SummaryTool {
    /// Page title
    #[json_schema(
        title = "Page title",
        description = "Exact page title, for example: Abyssal whip"
    )]
    pub title: String,
}

/// First page of an extracts query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPage {
    pub title: String,
    pub extract: String,
}

impl WikiService {
    /// Fetch a page's intro extract and render it as text.
    ///
    /// Never fails: every problem is rendered into the returned text.
    pub async fn summary(&self, title: &str) -> String {
        self.try_summary(title)
            .await
            .unwrap_or_else(|e| e.to_string())
    }

    /// Fetch a page's intro extract, keeping the failure reason tagged
    pub async fn try_summary(&self, title: &str) -> Result<String, ToolError> {
        if string::is_blank(title) {
            return Err(ToolError::MissingInput("title"));
        }

        let url = self.query_url(&[
            ("prop", "extracts"),
            ("exintro", "1"),
            ("explaintext", "1"),
            ("formatversion", "2"),
            ("titles", title),
        ]);

        tracing::debug!(title, "fetching page summary");
        let body = fetch_json(self.fetcher(), url).await?;

        let page = parse_summary_response(&body, title).ok_or(ToolError::PageNotFound)?;
        if page.extract.is_empty() {
            return Err(ToolError::NoSummary(page.title));
        }

        Ok(format!(
            "📄 {}\n\n{}\n\n🔗 {}",
            page.title,
            page.extract,
            self.page_url(&page.title)
        ))
    }
}

/// Read the first entry of `query.pages`.
///
/// The page title falls back to the requested one; the extract is trimmed.
fn parse_summary_response(json: &serde_json::Value, requested: &str) -> Option<SummaryPage> {
    let page = json
        .get("query")
        .and_then(|q| q.get("pages"))
        .and_then(serde_json::Value::as_array)
        .and_then(|pages| pages.first())?;

    let title = page
        .get("title")
        .and_then(serde_json::Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(requested)
        .to_string();
    let extract = page
        .get("extract")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(SummaryPage { title, extract })
}

/// Summary tool implementation
pub struct SummaryToolImpl {
    service: Arc<WikiService>,
}

impl SummaryToolImpl {
    #[must_use]
    pub fn new(service: Arc<WikiService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SummaryToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        SummaryTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: SummaryTool = serde_json::from_value(arguments).map_err(|e| {
            CallToolError::invalid_arguments("summary", Some(format!("Failed to parse arguments: {e}")))
        })?;

        Ok(text_result(self.service.summary(&params.title).await))
    }
}
