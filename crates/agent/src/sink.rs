//! Fire-and-forget turn persistence.
//!
//! Recording a finished turn happens after the stream has closed and must
//! never affect the client. A failed write is a log line.

use ragloop_core::backend::SessionStore;
use ragloop_core::turn::Turn;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct PersistenceSink {
    store: Arc<dyn SessionStore>,
}

impl PersistenceSink {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn record(&self, turn: Turn) {
        match self.store.append_turn(&turn).await {
            Ok(()) => {
                debug!(session = %turn.session_id, rounds = turn.rounds, "Turn recorded");
            }
            Err(err) => {
                warn!(session = %turn.session_id, error = %err, "Failed to record turn");
            }
        }
    }
}
