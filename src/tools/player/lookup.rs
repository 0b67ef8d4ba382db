//! Player data tool
#![allow(missing_docs)]

use super::PlayerDataService;
use crate::tools::{text_result, Tool};
use crate::utils::string;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const USERNAME_PROMPT: &str = "Please provide your RuneLite username to fetch player data.";
const NO_DATA_FALLBACK: &str = "No player data found.";
const DATA_HEADER: &str =
    "Player data fetched from WikiSync. This feature is only available for RuneLite client users.";

/// Player data tool parameters
#[macros::mcp_tool(
    name = "getPlayerData",
    title = "Get WikiSync Player Data",
    description = "Fetch a player's quests, achievement diaries, levels and collection log from WikiSync. Requires the RuneLite WikiSync plugin. Results are cached for one hour unless forceRefresh is set.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = true,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetPlayerDataTool {
    /// RuneLite username
    #[json_schema(
        title = "Username",
        description = "RuneLite username to fetch player data for"
    )]
    pub username: Option<String>,

    /// Bypass the cache
    #[serde(rename = "forceRefresh")]
    #[json_schema(
        title = "Force refresh",
        description = "Force refresh player data from WikiSync API",
        default = false
    )]
    pub force_refresh: Option<bool>,
}

/// Player data tool implementation
pub struct GetPlayerDataToolImpl {
    service: Arc<PlayerDataService>,
}

impl GetPlayerDataToolImpl {
    #[must_use]
    pub fn new(service: Arc<PlayerDataService>) -> Self {
        Self { service }
    }

    /// Render a lookup as the text the client sees
    pub async fn render(&self, username: Option<&str>, force_refresh: bool) -> String {
        let Some(username) = username.filter(|u| !string::is_blank(u)) else {
            return USERNAME_PROMPT.to_string();
        };

        let lookup = self.service.get_player_data(username, force_refresh).await;
        let Some(data) = lookup.data else {
            return lookup
                .message
                .unwrap_or_else(|| NO_DATA_FALLBACK.to_string());
        };

        match serde_json::to_string_pretty(&data) {
            Ok(json) => format!("{DATA_HEADER}\n\n{json}"),
            Err(e) => crate::error::ToolError::exception(&e).to_string(),
        }
    }
}

#[async_trait]
impl Tool for GetPlayerDataToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetPlayerDataTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        // Every field is optional, so a missing argument object is fine.
        let arguments = if arguments.is_null() {
            serde_json::json!({})
        } else {
            arguments
        };
        let params: GetPlayerDataTool = serde_json::from_value(arguments).map_err(|e| {
            CallToolError::invalid_arguments(
                "getPlayerData",
                Some(format!("Failed to parse arguments: {e}")),
            )
        })?;

        let content = self
            .render(params.username.as_deref(), params.force_refresh.unwrap_or(false))
            .await;

        Ok(text_result(content))
    }
}
