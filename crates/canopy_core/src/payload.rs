//! Outbound request payload construction.
//!
//! Builds the JSON body for whichever protocol shape the deployment speaks,
//! without leaking budget internals beyond the chat `max_tokens` field.

use serde::Serialize;

use crate::budget::TokenBudget;
use crate::protocol::Protocol;

/// Sampling temperature sent with chat-protocol requests.
const CHAT_TEMPERATURE: f64 = 0.9;

/// One user-triggered submission. `text` is the raw, unmodified input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub text: String,
    pub system_prompt: Option<String>,
    pub model: Option<String>,
}

/// JSON body for one outbound request; the shape is fixed per deployment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundPayload {
    Simple(SimplePayload),
    Chat(ChatPayload),
}

/// `{"prompt": ...}` body for the bespoke backend. No system prompt and no
/// token-limit field are sent on this protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimplePayload {
    pub prompt: String,
}

/// OpenAI-compatible streaming chat body. `max_tokens` carries the locally
/// computed remaining budget: the client tells the server how much room is
/// left.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl OutboundPayload {
    /// Assemble the body for `protocol`. The caller validates the budget
    /// before building; a non-positive remainder is clamped to zero rather
    /// than wrapping.
    pub fn build(protocol: &Protocol, request: &PromptRequest, budget: &TokenBudget) -> Self {
        match protocol {
            Protocol::Simple(_) => OutboundPayload::Simple(SimplePayload {
                prompt: request.text.clone(),
            }),
            Protocol::ChatCompletions => {
                let mut messages = Vec::with_capacity(2);
                if let Some(system_prompt) = &request.system_prompt {
                    messages.push(ChatMessage {
                        role: Role::System,
                        content: system_prompt.clone(),
                    });
                }
                messages.push(ChatMessage {
                    role: Role::User,
                    content: request.text.clone(),
                });

                OutboundPayload::Chat(ChatPayload {
                    model: request.model.clone().unwrap_or_default(),
                    messages,
                    max_tokens: budget.remaining.max(0) as u32,
                    temperature: CHAT_TEMPERATURE,
                    stream: true,
                })
            }
        }
    }
}
