//! Knowledge-base document search client.

use crate::envelope::ServiceClient;
use async_trait::async_trait;
use ragloop_core::backend::KnowledgeService;
use ragloop_core::error::BackendError;
use serde_json::json;

pub struct HttpKnowledgeService {
    client: ServiceClient,
}

impl HttpKnowledgeService {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: ServiceClient::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl KnowledgeService for HttpKnowledgeService {
    async fn search(&self, query: &str, top_k: usize) -> Result<serde_json::Value, BackendError> {
        self.client
            .post("/document/search", &json!({ "query": query, "top_k": top_k }))
            .await
    }
}
