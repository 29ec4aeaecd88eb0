//! External web search tool.
//!
//! Offered to the provider only when the inbound request opts in, so the
//! name is exported as a constant for the gating code.

use async_trait::async_trait;
use ragloop_core::backend::WebSearchService;
use ragloop_core::error::ToolError;
use ragloop_core::tool::{Tool, ToolResult};
use serde::Deserialize;
use std::sync::Arc;

pub const WEB_SEARCH_TOOL: &str = "web_search";

#[derive(Debug, Deserialize)]
struct WebSearchArgs {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

fn default_max_results() -> usize {
    5
}

pub struct WebSearchTool {
    service: Arc<dyn WebSearchService>,
}

impl WebSearchTool {
    pub fn new(service: Arc<dyn WebSearchService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Search the web for up-to-date information."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results (default: 5)",
                    "default": 5
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: WebSearchArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        let payload = self.service.search(&args.query, args.max_results).await?;
        Ok(ToolResult::success(self.name(), payload))
    }
}
