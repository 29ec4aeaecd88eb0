//! Knowledge-base document search tool.

use async_trait::async_trait;
use ragloop_core::backend::KnowledgeService;
use ragloop_core::error::ToolError;
use ragloop_core::tool::{Tool, ToolResult};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct SearchDocumentArgs {
    query: String,
    #[serde(default = "default_top_k")]
    top_k: usize,
}

fn default_top_k() -> usize {
    5
}

pub struct SearchDocumentTool {
    service: Arc<dyn KnowledgeService>,
}

impl SearchDocumentTool {
    pub fn new(service: Arc<dyn KnowledgeService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchDocumentTool {
    fn name(&self) -> &str {
        "search_document"
    }

    fn description(&self) -> &str {
        "Search the knowledge base for documents relevant to a query."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "top_k": {
                    "type": "integer",
                    "description": "Maximum number of documents to return (default: 5)",
                    "default": 5
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: SearchDocumentArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        let payload = self.service.search(&args.query, args.top_k).await?;
        Ok(ToolResult::success(self.name(), payload))
    }
}
