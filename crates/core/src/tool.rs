//! Tool trait, invocation records, and the registry.
//!
//! Tools are the capabilities the completion provider may request: memory
//! operations, document search, weather lookups, web search. Each one maps
//! to a backend service call.

use crate::error::ToolError;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request to invoke a tool, parsed from a provider response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the provider's tool_call.id)
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// Whether a tool invocation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolOutcome {
    Success,
    Error,
}

/// The uniform result of a tool invocation.
///
/// The dispatcher always produces one of these, whatever the backend did;
/// the loop folds it into the message sequence as a tool message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The tool that was invoked
    pub name: String,

    /// Success or error
    pub outcome: ToolOutcome,

    /// Backend payload on success
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,

    /// Cause on error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            outcome: ToolOutcome::Success,
            payload,
            error: None,
        }
    }

    pub fn error(name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: ToolOutcome::Error,
            payload: serde_json::Value::Null,
            error: Some(cause.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == ToolOutcome::Success
    }

    /// JSON encoding folded into the conversation as tool-message content.
    pub fn to_content(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"name":"{}","outcome":"error","error":"unencodable result"}}"#, self.name)
        })
    }
}

/// The core Tool trait.
///
/// Each tool implements this trait, validates its own arguments, and calls
/// its backend service. Tools are registered in the ToolRegistry and their
/// schemas are offered to the provider.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "get_weather").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the provider).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Invoke the tool with the given arguments.
    async fn invoke(&self, arguments: serde_json::Value) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the provider.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// The static catalogue of invocable tools.
///
/// Built once at startup and shared immutably; the loop uses it to offer
/// schemas to the provider, the dispatcher uses it to route invocations.
pub struct ToolRegistry {
    // BTreeMap keeps definitions() in a stable order across runs.
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All tool definitions, for sending to the provider.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Definitions filtered by name, for request-gated tools.
    pub fn definitions_except(&self, excluded: &[&str]) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .filter(|t| !excluded.contains(&t.name()))
            .map(|t| t.to_definition())
            .collect()
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
