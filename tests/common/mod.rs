//! 测试公共工具：可编程的 HTTP mock

#![allow(dead_code)]

use async_trait::async_trait;
use osrs_wiki_mcp::client::{ApiResponse, HttpFetch};
use osrs_wiki_mcp::{AppConfig, Error, OsrsWikiServer, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use url::Url;

/// 预设的上游响应
pub enum MockReply {
    /// 2xx + JSON body
    Json(serde_json::Value),
    /// 非成功状态码
    Status(u16),
    /// 传输层失败
    Fail(String),
}

/// 按顺序返回预设响应并记录所有请求 URL
#[derive(Default)]
pub struct MockFetcher {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<Url>>,
}

impl MockFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, reply: MockReply) -> &Self {
        self.replies.lock().push_back(reply);
        self
    }

    pub fn reply_json(&self, body: serde_json::Value) -> &Self {
        self.reply(MockReply::Json(body))
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// 最后一次请求的某个 query 参数
    pub fn last_param(&self, key: &str) -> Option<String> {
        let requests = self.requests.lock();
        let url = requests.last()?;
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

#[async_trait]
impl HttpFetch for MockFetcher {
    async fn get_json(&self, url: Url) -> Result<ApiResponse> {
        self.requests.lock().push(url);
        match self.replies.lock().pop_front() {
            Some(MockReply::Json(body)) => Ok(ApiResponse::Success(body)),
            Some(MockReply::Status(status)) => Ok(ApiResponse::Status(status)),
            Some(MockReply::Fail(message)) => Err(Error::HttpRequest(message)),
            None => Err(Error::HttpRequest("no mock reply queued".to_string())),
        }
    }
}

/// 使用默认配置和 mock 创建服务器
pub fn server_with(mock: &Arc<MockFetcher>) -> OsrsWikiServer {
    OsrsWikiServer::with_fetcher(AppConfig::default(), mock.clone()).expect("创建服务器失败")
}
