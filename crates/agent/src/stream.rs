//! Answer delivery: chunked frames plus exactly one terminal marker.
//!
//! Streaming is local. The provider is always called non-streaming; the
//! finalized answer is split into fixed-size character chunks and pushed
//! through the channel in order, followed by a single terminal chunk with
//! empty content and `done` set. After delivery has started there is no
//! other way to signal failure, so errors travel as a terminal chunk whose
//! content is the error message.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// One frame of a turn's response stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamChunk {
    pub content: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub done: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl StreamChunk {
    pub fn content(session_id: &str, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            session_id: session_id.to_string(),
            done: false,
        }
    }

    pub fn terminal(session_id: &str) -> Self {
        Self {
            content: String::new(),
            session_id: session_id.to_string(),
            done: true,
        }
    }
}

/// Split an answer into chunks of at most `chunk_chars` characters,
/// never inside a character.
pub fn chunk_answer(answer: &str, chunk_chars: usize) -> Vec<String> {
    let chars: Vec<char> = answer.chars().collect();
    chars
        .chunks(chunk_chars.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

/// Push a finalized answer down the channel: ordered content chunks, then
/// the terminal marker. A closed receiver means the client went away; the
/// remaining sends are skipped silently.
pub async fn deliver(
    answer: &str,
    session_id: &str,
    chunk_chars: usize,
    tx: &mpsc::Sender<StreamChunk>,
) {
    for piece in chunk_answer(answer, chunk_chars) {
        if tx.send(StreamChunk::content(session_id, piece)).await.is_err() {
            debug!(session = %session_id, "Client disconnected mid-stream");
            return;
        }
    }
    let _ = tx.send(StreamChunk::terminal(session_id)).await;
}

/// Report a failure in-band: one chunk carrying the error text, marked
/// terminal so the client stops reading.
pub async fn deliver_error(message: &str, session_id: &str, tx: &mpsc::Sender<StreamChunk>) {
    let chunk = StreamChunk {
        content: message.to_string(),
        session_id: session_id.to_string(),
        done: true,
    };
    let _ = tx.send(chunk).await;
}
