//! Completion provider adapters.
//!
//! One implementation covers every OpenAI-compatible chat-completions
//! endpoint (DashScope compatible mode, OpenAI, vLLM, Ollama, ...). The
//! loop only ever sees the `Provider` trait.

mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
