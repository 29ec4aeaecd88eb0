//! Conversation assembly: the ordered message sequence for one turn.
//!
//! Layout is fixed: one system message (instructions plus the current
//! timestamp), then up to K prior turns from the session backend as
//! user/assistant pairs, oldest first, then the new user message.
//!
//! History is best-effort. If the session backend is unreachable or slow,
//! the turn proceeds on system + user alone and the failure is a log line.

use chrono::Utc;
use ragloop_core::backend::SessionStore;
use ragloop_core::message::{Message, SessionId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Instructions used when no override is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant with access to tools for \
weather lookups, document search, web search, and long-term memory. Use a tool when the user's \
question needs external information; otherwise answer directly. Answer in the user's language, \
concisely.";

pub struct ConversationAssembler {
    store: Arc<dyn SessionStore>,
    system_prompt: String,
    history_turns: usize,
}

impl ConversationAssembler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        system_prompt: Option<String>,
        history_turns: usize,
    ) -> Self {
        Self {
            store,
            system_prompt: system_prompt.unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            history_turns,
        }
    }

    /// Build the message sequence for a new turn. Never fails.
    pub async fn assemble(&self, session_id: &SessionId, query: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2 + self.history_turns * 2);
        messages.push(Message::system(self.system_message()));

        match self.store.recent_turns(session_id, self.history_turns).await {
            Ok(records) => {
                debug!(session = %session_id, turns = records.len(), "Fetched history window");
                for record in records {
                    messages.push(Message::user(&record.query));
                    messages.push(Message::assistant(&record.answer));
                }
            }
            Err(err) => {
                warn!(session = %session_id, error = %err, "History fetch failed, proceeding without history");
            }
        }

        messages.push(Message::user(query));
        messages
    }

    fn system_message(&self) -> String {
        format!(
            "{}\n\nCurrent time: {}",
            self.system_prompt,
            Utc::now().to_rfc3339()
        )
    }
}
