//! External web search client.

use crate::envelope::ServiceClient;
use async_trait::async_trait;
use ragloop_core::backend::WebSearchService;
use ragloop_core::error::BackendError;
use serde_json::json;

pub struct HttpWebSearchService {
    client: ServiceClient,
}

impl HttpWebSearchService {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: ServiceClient::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl WebSearchService for HttpWebSearchService {
    async fn search(&self, query: &str, max_results: usize) -> Result<serde_json::Value, BackendError> {
        self.client
            .post("/search", &json!({ "query": query, "max_results": max_results }))
            .await
    }
}
