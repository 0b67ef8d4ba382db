//! Configuration module

use crate::cache::CacheConfig;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Upstream wiki and sync service configuration
    pub wiki: WikiConfig,

    /// Player data cache configuration
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name
    pub name: String,

    /// Server version
    pub version: String,

    /// Server description
    pub description: Option<String>,

    /// Host address
    pub host: String,

    /// Port
    pub port: u16,

    /// Transport mode: stdio, http, sse or hybrid
    pub transport_mode: String,
}

/// Upstream endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WikiConfig {
    /// MediaWiki `api.php` endpoint
    pub api_url: String,

    /// Base for article links (`<base>/w/<Title>`)
    pub page_base_url: String,

    /// WikiSync host
    pub sync_base_url: String,

    /// User-Agent sent with every request
    pub user_agent: String,

    /// Request timeout (seconds); unset means no timeout
    pub request_timeout_secs: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,

    /// Log file path
    pub file_path: Option<String>,

    /// Whether to enable console logging
    pub enable_console: bool,

    /// Whether to enable file logging
    pub enable_file: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
            description: Some(
                "Old School RuneScape wiki search, page summaries and WikiSync player data"
                    .to_string(),
            ),
            host: "127.0.0.1".to_string(),
            port: 8080,
            transport_mode: "hybrid".to_string(),
        }
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://oldschool.runescape.wiki/api.php".to_string(),
            page_base_url: "https://oldschool.runescape.wiki".to_string(),
            sync_base_url: "https://sync.runescape.wiki".to_string(),
            user_agent: crate::client::default_user_agent(),
            request_timeout_secs: None,
        }
    }
}

impl WikiConfig {
    /// Request timeout as a `Duration`
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: Some("./logs/osrs-wiki-mcp.log".to_string()),
            enable_console: true,
            enable_file: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails validation
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, directory creation or the write fails
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::Config(format!("Failed to create directory: {e}")))?;
            }
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error for an empty host, port 0, unknown transport mode or
    /// log level, or an unparseable upstream URL
    pub fn validate(&self) -> Result<(), Error> {
        if self.server.host.is_empty() {
            return Err(Error::Config("Server host cannot be empty".to_string()));
        }

        if self.server.port == 0 {
            return Err(Error::Config("Server port cannot be 0".to_string()));
        }

        let valid_modes = ["stdio", "http", "sse", "hybrid"];
        if !valid_modes.contains(&self.server.transport_mode.as_str()) {
            return Err(Error::Config(format!(
                "Invalid transport mode: {}, valid values: {:?}",
                self.server.transport_mode, valid_modes
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(Error::Config(format!(
                "Invalid log level: {}, valid values: {:?}",
                self.logging.level, valid_levels
            )));
        }

        for (field, value) in [
            ("wiki.api_url", &self.wiki.api_url),
            ("wiki.page_base_url", &self.wiki.page_base_url),
            ("wiki.sync_base_url", &self.wiki.sync_base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| Error::Config(format!("Invalid URL for {field}: {e}")))?;
        }

        if self.wiki.user_agent.trim().is_empty() {
            return Err(Error::Config("User agent cannot be empty".to_string()));
        }

        if self.cache.ttl_secs == 0 {
            return Err(Error::Config("Cache TTL cannot be 0".to_string()));
        }

        Ok(())
    }

    /// Override fields from `OSRS_WIKI_MCP_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed
    pub fn apply_env(&mut self) -> Result<(), Error> {
        if let Ok(host) = std::env::var("OSRS_WIKI_MCP_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("OSRS_WIKI_MCP_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid port: {e}")))?;
        }

        if let Ok(mode) = std::env::var("OSRS_WIKI_MCP_TRANSPORT_MODE") {
            self.server.transport_mode = mode;
        }

        if let Ok(level) = std::env::var("OSRS_WIKI_MCP_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(ttl) = std::env::var("OSRS_WIKI_MCP_CACHE_TTL_SECS") {
            self.cache.ttl_secs = ttl
                .parse()
                .map_err(|e| Error::Config(format!("Invalid cache TTL: {e}")))?;
        }

        if let Ok(user_agent) = std::env::var("OSRS_WIKI_MCP_USER_AGENT") {
            self.wiki.user_agent = user_agent;
        }

        Ok(())
    }

    /// Default configuration with environment overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is invalid or the result
    /// fails validation
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }
}
