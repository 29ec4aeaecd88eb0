//! Backend service traits — the external collaborators behind the tools.
//!
//! Each service is a plain request/response HTTP endpoint owned by another
//! process. The traits here are what the orchestrator needs from them and
//! nothing more; the HTTP clients live in `ragloop-backends`, and tests
//! substitute hand-written stubs.
//!
//! Service payloads stay as `serde_json::Value`: they are folded back into
//! the conversation verbatim for the model to read, so the orchestrator
//! never interprets their shape beyond envelope normalization.

use crate::error::BackendError;
use crate::message::SessionId;
use crate::turn::Turn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One persisted query/answer pair, as read back from the session backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub query: String,
    pub answer: String,
}

/// Session storage: bounded history reads and append-only turn writes.
///
/// Session lifecycle is the backend's responsibility; `create_session` is
/// only invoked lazily when a request arrives without a session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Ask the backend to open a new session.
    async fn create_session(&self) -> std::result::Result<SessionId, BackendError>;

    /// Read up to `limit` most recent turns, returned oldest first.
    async fn recent_turns(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> std::result::Result<Vec<TurnRecord>, BackendError>;

    /// Append a finished turn.
    async fn append_turn(&self, turn: &Turn) -> std::result::Result<(), BackendError>;
}

/// Weather lookups: current conditions and short/long-range forecasts.
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current(&self, location: &str) -> std::result::Result<serde_json::Value, BackendError>;

    async fn hourly(
        &self,
        location: &str,
        hours: u32,
    ) -> std::result::Result<serde_json::Value, BackendError>;

    async fn daily(
        &self,
        location: &str,
        days: u32,
    ) -> std::result::Result<serde_json::Value, BackendError>;
}

/// Knowledge-base document retrieval.
#[async_trait]
pub trait KnowledgeService: Send + Sync {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> std::result::Result<serde_json::Value, BackendError>;
}

/// Long-term memory CRUD.
#[async_trait]
pub trait MemoryService: Send + Sync {
    async fn add(
        &self,
        user_id: &str,
        content: &str,
        memory_type: Option<&str>,
        importance: Option<f32>,
    ) -> std::result::Result<serde_json::Value, BackendError>;

    async fn get(&self, memory_id: &str) -> std::result::Result<serde_json::Value, BackendError>;

    async fn search(
        &self,
        user_id: &str,
        query: &str,
        top_k: usize,
    ) -> std::result::Result<serde_json::Value, BackendError>;

    async fn delete(&self, memory_id: &str) -> std::result::Result<serde_json::Value, BackendError>;
}

/// External web search.
#[async_trait]
pub trait WebSearchService: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> std::result::Result<serde_json::Value, BackendError>;
}
