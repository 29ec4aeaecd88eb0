//! Tool dispatcher — routes invocations and never raises.
//!
//! The loop must always get a `ToolResult` back so it can fold something
//! into the conversation: unknown tools, bad arguments, and backend
//! failures all normalize to an error result here. Retrying is left to the
//! model, which sees the error and may re-invoke.

use ragloop_core::tool::{ToolCall, ToolRegistry, ToolResult};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute a tool call. Infallible by contract.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, "Unknown tool requested");
            return ToolResult::error(&call.name, "unknown tool");
        };

        debug!(tool = %call.name, "Dispatching tool call");

        match tool.invoke(call.arguments.clone()).await {
            Ok(result) => result,
            Err(err) => {
                warn!(tool = %call.name, error = %err, "Tool invocation failed");
                ToolResult::error(&call.name, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_registry;
    use crate::testutil::StubBackend;
    use ragloop_core::tool::ToolOutcome;

    fn dispatcher(failing: bool) -> Dispatcher {
        let make = || -> Arc<StubBackend> {
            if failing {
                Arc::new(StubBackend::failing())
            } else {
                Arc::new(StubBackend::ok())
            }
        };
        Dispatcher::new(Arc::new(builtin_registry(make(), make(), make(), make())))
    }

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: name.into(),
            arguments,
        }
    }

    #[tokio::test]
    async fn known_tool_with_valid_args_succeeds() {
        let result = dispatcher(false)
            .dispatch(&call("get_weather", serde_json::json!({"location": "Beijing"})))
            .await;
        assert_eq!(result.outcome, ToolOutcome::Success);
        assert_eq!(result.payload["temperature"], 20);
    }

    #[tokio::test]
    async fn missing_required_arg_is_error_result() {
        let result = dispatcher(false)
            .dispatch(&call("get_weather", serde_json::json!({})))
            .await;
        assert_eq!(result.outcome, ToolOutcome::Error);
        assert!(result.error.as_ref().unwrap().contains("location"));
    }

    #[tokio::test]
    async fn unknown_tool_is_error_result() {
        let result = dispatcher(false)
            .dispatch(&call("set_reminder", serde_json::json!({"when": "tomorrow"})))
            .await;
        assert_eq!(result.outcome, ToolOutcome::Error);
        assert_eq!(result.error.as_deref(), Some("unknown tool"));
        assert_eq!(result.name, "set_reminder");
    }

    #[tokio::test]
    async fn backend_failure_is_error_result() {
        let result = dispatcher(true)
            .dispatch(&call("get_weather", serde_json::json!({"location": "Beijing"})))
            .await;
        assert_eq!(result.outcome, ToolOutcome::Error);
        assert!(result.error.as_ref().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn non_object_arguments_are_error_result() {
        let result = dispatcher(false)
            .dispatch(&call("get_weather", serde_json::json!("Beijing")))
            .await;
        assert_eq!(result.outcome, ToolOutcome::Error);
    }
}
