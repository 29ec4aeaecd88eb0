//! Long-term memory tools: add, get, search, delete.

use async_trait::async_trait;
use ragloop_core::backend::MemoryService;
use ragloop_core::error::ToolError;
use ragloop_core::tool::{Tool, ToolResult};
use serde::Deserialize;
use std::sync::Arc;

fn parse_args<T: serde::de::DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct AddMemoryArgs {
    user_id: String,
    content: String,
    #[serde(default)]
    memory_type: Option<String>,
    #[serde(default)]
    importance: Option<f32>,
}

pub struct AddMemoryTool {
    service: Arc<dyn MemoryService>,
}

impl AddMemoryTool {
    pub fn new(service: Arc<dyn MemoryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for AddMemoryTool {
    fn name(&self) -> &str {
        "add_memory"
    }

    fn description(&self) -> &str {
        "Store a new long-term memory for a user."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "The user the memory belongs to"
                },
                "content": {
                    "type": "string",
                    "description": "The content to remember"
                },
                "memory_type": {
                    "type": "string",
                    "description": "Category of the memory (e.g. preference, fact)"
                },
                "importance": {
                    "type": "number",
                    "description": "Importance score between 0 and 1"
                }
            },
            "required": ["user_id", "content"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: AddMemoryArgs = parse_args(arguments)?;
        let payload = self
            .service
            .add(
                &args.user_id,
                &args.content,
                args.memory_type.as_deref(),
                args.importance,
            )
            .await?;
        Ok(ToolResult::success(self.name(), payload))
    }
}

#[derive(Debug, Deserialize)]
struct GetMemoryArgs {
    memory_id: String,
}

pub struct GetMemoryTool {
    service: Arc<dyn MemoryService>,
}

impl GetMemoryTool {
    pub fn new(service: Arc<dyn MemoryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetMemoryTool {
    fn name(&self) -> &str {
        "get_memory"
    }

    fn description(&self) -> &str {
        "Retrieve a stored memory by its id."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "memory_id": {
                    "type": "string",
                    "description": "The id of the memory to fetch"
                }
            },
            "required": ["memory_id"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: GetMemoryArgs = parse_args(arguments)?;
        let payload = self.service.get(&args.memory_id).await?;
        Ok(ToolResult::success(self.name(), payload))
    }
}

#[derive(Debug, Deserialize)]
struct SearchMemoryArgs {
    user_id: String,
    query: String,
    #[serde(default = "default_top_k")]
    top_k: usize,
}

fn default_top_k() -> usize {
    5
}

pub struct SearchMemoryTool {
    service: Arc<dyn MemoryService>,
}

impl SearchMemoryTool {
    pub fn new(service: Arc<dyn MemoryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchMemoryTool {
    fn name(&self) -> &str {
        "search_memory"
    }

    fn description(&self) -> &str {
        "Search a user's stored memories by relevance to a query."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "The user whose memories to search"
                },
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "top_k": {
                    "type": "integer",
                    "description": "Maximum number of memories to return (default: 5)",
                    "default": 5
                }
            },
            "required": ["user_id", "query"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: SearchMemoryArgs = parse_args(arguments)?;
        let payload = self
            .service
            .search(&args.user_id, &args.query, args.top_k)
            .await?;
        Ok(ToolResult::success(self.name(), payload))
    }
}

#[derive(Debug, Deserialize)]
struct DeleteMemoryArgs {
    memory_id: String,
}

pub struct DeleteMemoryTool {
    service: Arc<dyn MemoryService>,
}

impl DeleteMemoryTool {
    pub fn new(service: Arc<dyn MemoryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for DeleteMemoryTool {
    fn name(&self) -> &str {
        "delete_memory"
    }

    fn description(&self) -> &str {
        "Delete a stored memory by its id."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "memory_id": {
                    "type": "string",
                    "description": "The id of the memory to delete"
                }
            },
            "required": ["memory_id"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: DeleteMemoryArgs = parse_args(arguments)?;
        let payload = self.service.delete(&args.memory_id).await?;
        Ok(ToolResult::success(self.name(), payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StubBackend;

    #[tokio::test]
    async fn add_memory_with_optional_fields() {
        let tool = AddMemoryTool::new(Arc::new(StubBackend::ok()));
        let result = tool
            .invoke(serde_json::json!({
                "user_id": "u1",
                "content": "prefers metric units",
                "memory_type": "preference",
                "importance": 0.8
            }))
            .await
            .unwrap();
        assert!(result.is_success());
        assert_eq!(result.payload["user_id"], "u1");
    }

    #[tokio::test]
    async fn add_memory_requires_content() {
        let tool = AddMemoryTool::new(Arc::new(StubBackend::ok()));
        let err = tool
            .invoke(serde_json::json!({"user_id": "u1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn get_memory_by_id() {
        let tool = GetMemoryTool::new(Arc::new(StubBackend::ok()));
        let result = tool
            .invoke(serde_json::json!({"memory_id": "mem_7"}))
            .await
            .unwrap();
        assert_eq!(result.payload["memory_id"], "mem_7");
    }

    #[tokio::test]
    async fn search_memory_defaults_top_k() {
        let tool = SearchMemoryTool::new(Arc::new(StubBackend::ok()));
        let result = tool
            .invoke(serde_json::json!({"user_id": "u1", "query": "units"}))
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn delete_memory_backend_failure() {
        let tool = DeleteMemoryTool::new(Arc::new(StubBackend::failing()));
        let err = tool
            .invoke(serde_json::json!({"memory_id": "mem_7"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Backend(_)));
    }
}
