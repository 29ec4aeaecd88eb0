//! Long-term memory service client.

use crate::envelope::ServiceClient;
use async_trait::async_trait;
use ragloop_core::backend::MemoryService;
use ragloop_core::error::BackendError;
use serde_json::json;

pub struct HttpMemoryService {
    client: ServiceClient,
}

impl HttpMemoryService {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: ServiceClient::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl MemoryService for HttpMemoryService {
    async fn add(
        &self,
        user_id: &str,
        content: &str,
        memory_type: Option<&str>,
        importance: Option<f32>,
    ) -> Result<serde_json::Value, BackendError> {
        let mut body = json!({ "user_id": user_id, "content": content });
        if let Some(t) = memory_type {
            body["memory_type"] = json!(t);
        }
        if let Some(i) = importance {
            body["importance"] = json!(i);
        }
        self.client.post("/memory/add", &body).await
    }

    async fn get(&self, memory_id: &str) -> Result<serde_json::Value, BackendError> {
        self.client
            .post("/memory/get", &json!({ "memory_id": memory_id }))
            .await
    }

    async fn search(
        &self,
        user_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<serde_json::Value, BackendError> {
        self.client
            .post(
                "/memory/search",
                &json!({ "user_id": user_id, "query": query, "top_k": top_k }),
            )
            .await
    }

    async fn delete(&self, memory_id: &str) -> Result<serde_json::Value, BackendError> {
        self.client
            .post("/memory/delete", &json!({ "memory_id": memory_id }))
            .await
    }
}
