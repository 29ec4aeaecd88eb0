//! # ragloop Core
//!
//! Domain types, traits, and error definitions for the ragloop assistant
//! orchestrator. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (completion provider, session store, the tool
//! backend services) is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod backend;
pub mod error;
pub mod message;
pub mod provider;
pub mod tool;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use backend::{
    KnowledgeService, MemoryService, SessionStore, TurnRecord, WeatherService, WebSearchService,
};
pub use error::{BackendError, Error, ProviderError, Result, ToolError};
pub use message::{Message, MessageToolCall, Role, SessionId};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use tool::{Tool, ToolCall, ToolOutcome, ToolRegistry, ToolResult};
pub use turn::{ToolInvocation, Turn};
