//! Error handling module
//!
//! Two layers live here. [`Error`] covers infrastructure failures (config,
//! transport, startup). [`ToolError`] is the tagged reason a tool call could
//! not produce its normal answer; it is rendered as text and handed back to
//! the client inside a successful tool result, never raised as a protocol
//! failure.

use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum Error {
    /// Initialization error
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    /// Parse error
    #[error("Parse failed: {0}")]
    Parse(String),

    /// MCP protocol error
    #[error("MCP protocol error: {0}")]
    Mcp(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Other error
    #[error("Unknown error: {0}")]
    Other(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Other(err.to_string())
    }
}

/// Message returned when WikiSync has nothing for a username.
pub const NO_PLAYER_DATA_MESSAGE: &str = "No player data found. Please ensure that the username is correct. If you are using RuneLite, please install the WikiSync plugin and ensure you are using the RuneLite client. This feature is only available for RuneLite users.";

/// Reason a tool could not produce its regular output.
///
/// The `Display` text is exactly what the client sees. Leading markers keep
/// the four failure classes apart: `❌ Error:` for validation and exceptions,
/// `❌ API Error:` for upstream status codes, `🔎`/`⚠️` for empty results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// A required string argument was empty or whitespace
    #[error("❌ Error: {0} is required")]
    MissingInput(&'static str),

    /// Upstream answered with a non-success HTTP status
    #[error("❌ API Error: {0}")]
    Status(u16),

    /// Search returned no hits
    #[error("🔎 No results found")]
    NoResults,

    /// Summary query returned no pages
    #[error("🔎 Page not found")]
    PageNotFound,

    /// The page exists but has no intro extract
    #[error("⚠️ No summary available for '{0}'")]
    NoSummary(String),

    /// WikiSync returned an empty payload
    #[error("{}", NO_PLAYER_DATA_MESSAGE)]
    NoPlayerData,

    /// Transport or decode failure
    #[error("❌ Error: {0}")]
    Exception(String),
}

impl ToolError {
    /// Wrap an infrastructure error, falling back to a generic message when
    /// the error renders as an empty string.
    #[must_use]
    pub fn exception<E: std::fmt::Display + ?Sized>(err: &E) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            ToolError::Exception("Unknown error".to_string())
        } else {
            ToolError::Exception(message)
        }
    }
}
