//! HTTP client adapter
//!
//! Every outbound call in the server is a single GET that expects a JSON
//! body. [`HttpFetch`] is that one operation; [`ReqwestFetcher`] is the
//! production implementation.

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Outcome of a GET that reached the server
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 2xx status with its decoded JSON body
    Success(serde_json::Value),
    /// Any other status; the body is not read
    Status(u16),
}

/// Issues a GET and decodes the JSON body.
///
/// Transport and decode failures come back as `Err`; a non-success status is
/// not an error at this layer.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET `url` and parse the response as JSON
    async fn get_json(&self, url: Url) -> Result<ApiResponse>;
}

/// `reqwest`-backed fetcher
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Wrap an existing client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get HTTP client
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_json(&self, url: Url) -> Result<ApiResponse> {
        tracing::debug!(url = %url, "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "upstream returned non-success status");
            return Ok(ApiResponse::Status(status.as_u16()));
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(ApiResponse::Success(body))
    }
}

/// HTTP client builder
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    connect_timeout: Duration,
    pool_max_idle_per_host: usize,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpClientBuilder {
    /// Create a new HTTP client builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set request timeout. Without one, requests may wait indefinitely.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout
    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Set connection pool size
    #[must_use]
    pub fn pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }

    /// Set User-Agent
    #[must_use]
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Build HTTP client
    pub fn build(self) -> Result<Client> {
        let mut builder = Client::builder()
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| Error::HttpRequest(e.to_string()))
    }

    /// Build a [`ReqwestFetcher`] around the configured client
    pub fn build_fetcher(self) -> Result<ReqwestFetcher> {
        Ok(ReqwestFetcher::new(self.build()?))
    }
}

/// Identifying User-Agent sent with every request
#[must_use]
pub fn default_user_agent() -> String {
    format!("{}/{} (Rust)", crate::NAME, crate::VERSION)
}
