//! Backend protocol shapes and their routes.

use crate::frame::{ChatDeltaSource, DeltaSource, SimpleDeltaSource};

/// Which JSON envelope structure a given backend deployment speaks.
///
/// Exactly one shape is active per deployment, selected by configuration.
/// There is no runtime negotiation or auto-detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Bespoke backend endpoints streaming `{"delta": "..."}` envelopes.
    Simple(SimpleRoute),
    /// OpenAI-compatible `/v1/chat/completions` streaming.
    ChatCompletions,
}

/// Routes exposed by the bespoke backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleRoute {
    Summarize,
    Rag,
}

impl Protocol {
    /// URL path appended to the configured base endpoint.
    pub fn route(&self) -> &'static str {
        match self {
            Protocol::Simple(SimpleRoute::Summarize) => "/summarize",
            Protocol::Simple(SimpleRoute::Rag) => "/rag",
            Protocol::ChatCompletions => "/v1/chat/completions",
        }
    }

    /// Caption for the output widget fed through the rendering sink.
    pub fn label(&self) -> &'static str {
        match self {
            Protocol::Simple(SimpleRoute::Rag) => "RAG Answer",
            _ => "Summary",
        }
    }

    /// Envelope decoder for this protocol's stream frames.
    pub fn delta_source(&self) -> &'static dyn DeltaSource {
        match self {
            Protocol::Simple(_) => &SimpleDeltaSource,
            Protocol::ChatCompletions => &ChatDeltaSource,
        }
    }
}
