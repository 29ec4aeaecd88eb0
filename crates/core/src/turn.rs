//! Turn — one query/answer exchange within a session.
//!
//! Created at request start, filled in by the loop, immutable once handed
//! to the persistence sink.

use crate::message::SessionId;
use crate::tool::ToolOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one tool invocation performed during a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: serde_json::Value,
    pub outcome: ToolOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One user query and its assistant answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub session_id: SessionId,

    pub query: String,

    pub answer: String,

    /// When the request started
    pub started_at: DateTime<Utc>,

    /// Tool invocations performed, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invocations: Vec<ToolInvocation>,

    /// Provider rounds consumed (tool rounds + the finalizing call)
    pub rounds: u32,

    /// Set when the turn was cut off by the tool round cap
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub budget_exhausted: bool,
}

impl Turn {
    pub fn new(session_id: SessionId, query: impl Into<String>) -> Self {
        Self {
            session_id,
            query: query.into(),
            answer: String::new(),
            started_at: Utc::now(),
            invocations: Vec::new(),
            rounds: 0,
            budget_exhausted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_turn_is_empty() {
        let turn = Turn::new(SessionId::from("42"), "hello");
        assert_eq!(turn.query, "hello");
        assert!(turn.answer.is_empty());
        assert!(turn.invocations.is_empty());
        assert!(!turn.budget_exhausted);
    }

    #[test]
    fn serialization_omits_default_flags() {
        let turn = Turn::new(SessionId::from("42"), "hello");
        let json = serde_json::to_string(&turn).unwrap();
        assert!(!json.contains("budget_exhausted"));
        assert!(!json.contains("invocations"));
    }
}
