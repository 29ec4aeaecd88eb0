//! The turn orchestrator — the heart of ragloop.
//!
//! One turn flows through four stages:
//!
//! 1. **Assemble**: system prompt + recent history window + the new query
//! 2. **Loop**: call the provider; on a tool request, dispatch it, fold the
//!    request and its result back into the sequence, repeat (bounded)
//! 3. **Deliver**: chunk the finalized answer onto the client's stream,
//!    then the terminal marker
//! 4. **Persist**: record the finished turn, fire-and-forget
//!
//! Stages 1 and 4 degrade gracefully: a failed history fetch or a failed
//! persist is a log line, never a failed turn. Once delivery has started,
//! all failures travel in-band as a terminal error chunk.

pub mod assembler;
pub mod loop_runner;
pub mod service;
pub mod sink;
pub mod stream;

pub use assembler::ConversationAssembler;
pub use loop_runner::{CompletionLoop, TurnOutcome};
pub use service::{TurnRequest, TurnService};
pub use sink::PersistenceSink;
pub use stream::StreamChunk;
