//! Session backend client: session creation, history reads, turn appends.

use crate::envelope::ServiceClient;
use async_trait::async_trait;
use ragloop_core::backend::{SessionStore, TurnRecord};
use ragloop_core::error::BackendError;
use ragloop_core::message::SessionId;
use ragloop_core::turn::Turn;
use serde::Deserialize;
use serde_json::json;

pub struct HttpSessionStore {
    client: ServiceClient,
}

impl HttpSessionStore {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: ServiceClient::new(base_url, timeout)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreateSessionData {
    session_id: String,
}

#[derive(Debug, Deserialize, Default)]
struct RecentTurnsData {
    #[serde(default)]
    records: Vec<TurnRecord>,
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    async fn create_session(&self) -> Result<SessionId, BackendError> {
        let data = self.client.post("/session/create", &json!({})).await?;
        let parsed: CreateSessionData =
            serde_json::from_value(data).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(SessionId(parsed.session_id))
    }

    async fn recent_turns(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<TurnRecord>, BackendError> {
        let data = self
            .client
            .post(
                "/chat/record/get",
                &json!({ "session_id": session_id.0, "limit": limit }),
            )
            .await?;
        let parsed: RecentTurnsData =
            serde_json::from_value(data).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(parsed.records)
    }

    async fn append_turn(&self, turn: &Turn) -> Result<(), BackendError> {
        let invocations = serde_json::to_value(&turn.invocations)
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        self.client
            .post(
                "/chat/record/add",
                &json!({
                    "session_id": turn.session_id.0,
                    "query": turn.query,
                    "answer": turn.answer,
                    "started_at": turn.started_at.to_rfc3339(),
                    "tool_calls": invocations,
                    "rounds": turn.rounds,
                    "budget_exhausted": turn.budget_exhausted,
                }),
            )
            .await?;
        Ok(())
    }
}
