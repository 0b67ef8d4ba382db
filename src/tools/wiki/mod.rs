//! OSRS wiki tools module

pub mod search;
pub mod summary;

use crate::client::HttpFetch;
use crate::config::WikiConfig;
use crate::error::Result;
use std::sync::Arc;
use url::Url;

/// Wiki query service shared by the search and summary tools
pub struct WikiService {
    fetcher: Arc<dyn HttpFetch>,
    api_url: Url,
    page_base_url: String,
}

impl WikiService {
    /// Create a new wiki service
    ///
    /// # Errors
    ///
    /// Returns an error if `config.api_url` is not a valid URL
    pub fn new(fetcher: Arc<dyn HttpFetch>, config: &WikiConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            api_url: Url::parse(&config.api_url)?,
            page_base_url: config.page_base_url.clone(),
        })
    }

    /// Get HTTP fetcher
    #[must_use]
    pub fn fetcher(&self) -> &dyn HttpFetch {
        self.fetcher.as_ref()
    }

    /// `api.php` URL with `action=query&format=json` plus `params`
    #[must_use]
    pub fn query_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .extend_pairs(params);
        url
    }

    /// Article URL for a page title
    #[must_use]
    pub fn page_url(&self, title: &str) -> String {
        crate::utils::url::build_page_url(&self.page_base_url, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiResponse;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl HttpFetch for Unreachable {
        async fn get_json(&self, _url: Url) -> Result<ApiResponse> {
            unreachable!("no request expected")
        }
    }

    #[test]
    fn test_query_url_params() {
        let service = WikiService::new(Arc::new(Unreachable), &WikiConfig::default()).unwrap();
        let url = service.query_url(&[("list", "search"), ("srsearch", "dragon & co")]);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("action".to_string(), "query".to_string()),
                ("format".to_string(), "json".to_string()),
                ("list".to_string(), "search".to_string()),
                ("srsearch".to_string(), "dragon & co".to_string()),
            ]
        );
        assert_eq!(url.path(), "/api.php");
    }

    #[test]
    fn test_invalid_api_url() {
        let config = WikiConfig {
            api_url: "::nope::".to_string(),
            ..WikiConfig::default()
        };
        assert!(WikiService::new(Arc::new(Unreachable), &config).is_err());
    }
}
