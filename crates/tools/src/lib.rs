//! Built-in tools and the dispatcher for ragloop.
//!
//! Each tool wraps one backend service operation: weather lookups and
//! forecasts, knowledge-base document search, web search, and long-term
//! memory CRUD. Tools validate their own arguments against a typed struct
//! before touching the backend.
//!
//! The `Dispatcher` is the loop's only entry point into tool execution:
//! it always returns a `ToolResult`, never an error.

pub mod dispatcher;
pub mod document;
pub mod memory;
pub mod weather;
pub mod web_search;

use ragloop_core::backend::{KnowledgeService, MemoryService, WeatherService, WebSearchService};
use ragloop_core::tool::ToolRegistry;
use std::sync::Arc;

pub use dispatcher::Dispatcher;
pub use web_search::WEB_SEARCH_TOOL;

/// Create the builtin tool registry wired to the given backend services.
pub fn builtin_registry(
    weather: Arc<dyn WeatherService>,
    knowledge: Arc<dyn KnowledgeService>,
    memory: Arc<dyn MemoryService>,
    web: Arc<dyn WebSearchService>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Box::new(weather::CurrentWeatherTool::new(weather.clone())));
    registry.register(Box::new(weather::HourlyWeatherTool::new(weather.clone())));
    registry.register(Box::new(weather::DailyWeatherTool::new(weather)));

    registry.register(Box::new(document::SearchDocumentTool::new(knowledge)));

    registry.register(Box::new(memory::AddMemoryTool::new(memory.clone())));
    registry.register(Box::new(memory::GetMemoryTool::new(memory.clone())));
    registry.register(Box::new(memory::SearchMemoryTool::new(memory.clone())));
    registry.register(Box::new(memory::DeleteMemoryTool::new(memory)));

    registry.register(Box::new(web_search::WebSearchTool::new(web)));

    registry
}

#[cfg(test)]
pub(crate) mod testutil {
    use async_trait::async_trait;
    use ragloop_core::backend::{
        KnowledgeService, MemoryService, WeatherService, WebSearchService,
    };
    use ragloop_core::error::BackendError;
    use serde_json::json;

    /// Backend stubs that either answer with a canned payload or fail the
    /// way a broken service would.
    pub struct StubBackend {
        pub fail: Option<BackendError>,
    }

    impl StubBackend {
        pub fn ok() -> Self {
            Self { fail: None }
        }

        pub fn failing() -> Self {
            Self {
                fail: Some(BackendError::Service {
                    code: 500,
                    message: "upstream unavailable".into(),
                }),
            }
        }

        fn result(&self, payload: serde_json::Value) -> Result<serde_json::Value, BackendError> {
            match &self.fail {
                Some(err) => Err(err.clone()),
                None => Ok(payload),
            }
        }
    }

    #[async_trait]
    impl WeatherService for StubBackend {
        async fn current(&self, location: &str) -> Result<serde_json::Value, BackendError> {
            self.result(json!({ "location": location, "temperature": 20, "condition": "sunny" }))
        }

        async fn hourly(
            &self,
            location: &str,
            hours: u32,
        ) -> Result<serde_json::Value, BackendError> {
            self.result(json!({ "location": location, "hours": hours, "forecast": [] }))
        }

        async fn daily(
            &self,
            location: &str,
            days: u32,
        ) -> Result<serde_json::Value, BackendError> {
            self.result(json!({ "location": location, "days": days, "forecast": [] }))
        }
    }

    #[async_trait]
    impl KnowledgeService for StubBackend {
        async fn search(
            &self,
            query: &str,
            top_k: usize,
        ) -> Result<serde_json::Value, BackendError> {
            self.result(json!({ "query": query, "top_k": top_k, "documents": [] }))
        }
    }

    #[async_trait]
    impl MemoryService for StubBackend {
        async fn add(
            &self,
            user_id: &str,
            content: &str,
            _memory_type: Option<&str>,
            _importance: Option<f32>,
        ) -> Result<serde_json::Value, BackendError> {
            self.result(json!({ "memory_id": "mem_1", "user_id": user_id, "content": content }))
        }

        async fn get(&self, memory_id: &str) -> Result<serde_json::Value, BackendError> {
            self.result(json!({ "memory_id": memory_id, "content": "remembered" }))
        }

        async fn search(
            &self,
            user_id: &str,
            query: &str,
            _top_k: usize,
        ) -> Result<serde_json::Value, BackendError> {
            self.result(json!({ "user_id": user_id, "query": query, "memories": [] }))
        }

        async fn delete(&self, memory_id: &str) -> Result<serde_json::Value, BackendError> {
            self.result(json!({ "memory_id": memory_id, "deleted": true }))
        }
    }

    #[async_trait]
    impl WebSearchService for StubBackend {
        async fn search(
            &self,
            query: &str,
            max_results: usize,
        ) -> Result<serde_json::Value, BackendError> {
            self.result(json!({ "query": query, "max_results": max_results, "results": [] }))
        }
    }
}
