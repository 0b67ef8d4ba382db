//! WikiSync player data module
//!
//! Player data is served from the cache while it is younger than the TTL;
//! otherwise it is fetched from the sync service and the entry is replaced.
//! Concurrent lookups for the same username may both miss and both fetch;
//! whichever finishes last owns the entry.

pub mod lookup;

use crate::cache::{Cache, CacheEntry};
use crate::client::HttpFetch;
use crate::config::WikiConfig;
use crate::error::{Result, ToolError};
use crate::tools::fetch_json;
use crate::utils::url::encode_uri_component;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Result of a player data lookup
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLookup {
    /// Player payload, `None` when nothing usable was returned
    pub data: Option<serde_json::Value>,
    /// Why `data` is missing
    pub message: Option<String>,
}

impl PlayerLookup {
    fn found(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }

    fn failed(reason: &ToolError) -> Self {
        Self {
            data: None,
            message: Some(reason.to_string()),
        }
    }
}

/// Player data service owning the per-username cache
pub struct PlayerDataService {
    fetcher: Arc<dyn HttpFetch>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
    sync_base_url: String,
}

impl PlayerDataService {
    /// Create a new player data service
    ///
    /// # Errors
    ///
    /// Returns an error if `config.sync_base_url` is not a valid URL
    pub fn new(
        fetcher: Arc<dyn HttpFetch>,
        cache: Arc<dyn Cache>,
        ttl: Duration,
        config: &WikiConfig,
    ) -> Result<Self> {
        Url::parse(&config.sync_base_url)?;
        Ok(Self {
            fetcher,
            cache,
            ttl,
            sync_base_url: config.sync_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get cache
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Freshness window for cached entries
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sync service URL for a username
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL does not parse
    pub fn player_url(&self, username: &str) -> Result<Url> {
        let url = format!(
            "{}/runelite/player/{}/STANDARD",
            self.sync_base_url,
            encode_uri_component(username)
        );
        Ok(Url::parse(&url)?)
    }

    /// Look up player data, serving a fresh cache entry when allowed.
    ///
    /// Failures never touch the cache, so a stale entry survives for the
    /// next attempt.
    pub async fn get_player_data(&self, username: &str, force_refresh: bool) -> PlayerLookup {
        let now = Instant::now();

        if !force_refresh {
            if let Some(entry) = self.cache.get(username).await {
                if entry.is_fresh(self.ttl, now) {
                    tracing::debug!(username, "player data served from cache");
                    return PlayerLookup::found(entry.data);
                }
            }
        }

        match self.fetch(username).await {
            Ok(data) => {
                tracing::info!(username, force_refresh, "player data fetched from WikiSync");
                self.cache
                    .set(
                        username.to_string(),
                        CacheEntry {
                            data: data.clone(),
                            fetched_at: now,
                        },
                    )
                    .await;
                PlayerLookup::found(data)
            }
            Err(reason) => {
                tracing::info!(username, %reason, "player data unavailable");
                PlayerLookup::failed(&reason)
            }
        }
    }

    async fn fetch(&self, username: &str) -> std::result::Result<serde_json::Value, ToolError> {
        let url = self
            .player_url(username)
            .map_err(|e| ToolError::exception(&e))?;

        let data = fetch_json(self.fetcher.as_ref(), url).await?;
        if is_empty_payload(&data) {
            return Err(ToolError::NoPlayerData);
        }
        Ok(data)
    }
}

/// A payload with nothing in it: `null`, `{}`, `[]`, `""`, or a bare scalar
fn is_empty_payload(data: &serde_json::Value) -> bool {
    use serde_json::Value;

    match data {
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
