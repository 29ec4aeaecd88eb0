//! The completion loop: provider calls, tool dispatch, folding, finalize.
//!
//! Each provider call returns either a tool request or final text. Tool
//! requests are dispatched one at a time (only the first call of a response
//! is acted on), the request and its result are folded back into the
//! sequence, and the provider is asked again. The loop is bounded: after
//! `max_tool_rounds` folded rounds it finalizes with a partial answer
//! instead of asking the provider again.
//!
//! Only a provider failure aborts the turn. Tool failures of every kind,
//! including unparseable argument payloads, fold back as error results for
//! the model to react to, and still consume a round.

use ragloop_core::error::ProviderError;
use ragloop_core::message::Message;
use ragloop_core::provider::{Provider, ProviderRequest, ToolDefinition};
use ragloop_core::tool::{ToolCall, ToolResult};
use ragloop_core::turn::ToolInvocation;
use ragloop_tools::Dispatcher;
use std::sync::Arc;
use tracing::{debug, warn};

/// The answer delivered when the round cap cuts a turn short.
pub const BUDGET_EXCEEDED_ANSWER: &str =
    "I wasn't able to finish answering within the allowed number of tool calls. \
Please try rephrasing your question.";

pub struct CompletionLoop {
    provider: Arc<dyn Provider>,
    dispatcher: Arc<Dispatcher>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    max_tool_rounds: u32,
}

/// What one run of the loop produced.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The final answer text
    pub answer: String,

    /// Provider calls made
    pub rounds: u32,

    /// Tool invocations performed, in order
    pub invocations: Vec<ToolInvocation>,

    /// True when the round cap forced finalization
    pub budget_exhausted: bool,

    /// The full folded message sequence
    pub messages: Vec<Message>,
}

impl CompletionLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        dispatcher: Arc<Dispatcher>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            dispatcher,
            model: model.into(),
            temperature,
            max_tokens: None,
            max_tool_rounds: 8,
        }
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Run the loop over an assembled message sequence until it finalizes.
    pub async fn run(
        &self,
        mut messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
    ) -> Result<TurnOutcome, ProviderError> {
        let mut invocations: Vec<ToolInvocation> = Vec::new();
        let mut rounds = 0u32;

        loop {
            if invocations.len() as u32 >= self.max_tool_rounds {
                warn!(
                    rounds = invocations.len(),
                    "Tool round cap reached, finalizing with partial answer"
                );
                return Ok(TurnOutcome {
                    answer: BUDGET_EXCEEDED_ANSWER.to_string(),
                    rounds,
                    invocations,
                    budget_exhausted: true,
                    messages,
                });
            }

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tools.clone(),
            };

            let response = self.provider.complete(request).await?;
            rounds += 1;

            let assistant = response.message;
            let Some(tc) = assistant.tool_calls.first().cloned() else {
                debug!(rounds, tool_rounds = invocations.len(), "Turn finalized");
                let answer = assistant.content.clone();
                messages.push(assistant);
                return Ok(TurnOutcome {
                    answer,
                    rounds,
                    invocations,
                    budget_exhausted: false,
                    messages,
                });
            };

            if assistant.tool_calls.len() > 1 {
                debug!(
                    requested = assistant.tool_calls.len(),
                    "Multiple tool calls in one response, acting on the first only"
                );
            }

            let (arguments, result) = match serde_json::from_str::<serde_json::Value>(&tc.arguments)
            {
                Ok(args) => {
                    let call = ToolCall {
                        id: tc.id.clone(),
                        name: tc.name.clone(),
                        arguments: args.clone(),
                    };
                    (args, self.dispatcher.dispatch(&call).await)
                }
                Err(err) => {
                    warn!(tool = %tc.name, error = %err, "Unparseable tool argument payload");
                    (
                        serde_json::Value::Null,
                        ToolResult::error(&tc.name, format!("invalid argument payload: {err}")),
                    )
                }
            };

            invocations.push(ToolInvocation {
                name: tc.name.clone(),
                arguments,
                outcome: result.outcome,
                error: result.error.clone(),
            });

            // Fold: the request, then its result, before the next call.
            messages.push(Message::tool_request(tc.clone()));
            messages.push(Message::tool_result(&tc.id, result.to_content()));
        }
    }
}
