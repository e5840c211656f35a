//! One streaming request/response exchange.
//!
//! The session owns the accumulator for exactly one submission: validation,
//! the POST, frame consumption, and the terminal outcome. A new submission
//! constructs a new session; dropping an in-flight session closes the
//! connection and discards its accumulator.

use std::time::Duration;

use futures_util::TryStreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use thiserror::Error;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

use canopy_core::{estimate, parse_line, FrameParseError, OutboundPayload, PromptRequest, Protocol};

use crate::config::Config;
use crate::sink::RenderSink;

/// Total-call timeout for the streaming request, covering the entire stream
/// duration rather than just connection setup.
pub const STREAM_TIMEOUT: Duration = Duration::from_secs(120);

/// Terminal result of one submission. All failures are recovered here and
/// surfaced as a value; nothing propagates further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Stream completed; carries the full accumulated text.
    Success(String),
    /// Input was empty or all-whitespace. Pre-flight, no network contact.
    EmptyInput,
    /// Estimated tokens left the budget at or below zero. Pre-flight.
    BudgetExceeded,
    /// No backend endpoint configured. Pre-flight.
    ConfigMissing,
    /// The request or stream failed after validation passed.
    TransportError(String),
}

/// Failures between connection open and stream end.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("stream read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Frame(#[from] FrameParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Validating,
    Rejected,
    AwaitingConnection,
    Streaming,
    Completed,
    Failed,
}

/// Drives one exchange against the configured backend.
///
/// `run` consumes the session, so overlapping submissions are impossible by
/// construction: starting a new one means the prior session (and its
/// connection) has been dropped.
pub struct StreamingSession<'a, S: RenderSink> {
    client: &'a reqwest::Client,
    config: &'a Config,
    protocol: Protocol,
    sink: &'a mut S,
    phase: Phase,
    accumulated: String,
}

impl<'a, S: RenderSink> StreamingSession<'a, S> {
    pub fn new(
        client: &'a reqwest::Client,
        config: &'a Config,
        protocol: Protocol,
        sink: &'a mut S,
    ) -> Self {
        StreamingSession {
            client,
            config,
            protocol,
            sink,
            phase: Phase::Idle,
            accumulated: String::new(),
        }
    }

    /// Validate and run one submission to its terminal outcome.
    ///
    /// Checks run in order (empty input, endpoint, budget) and the first
    /// failure short-circuits without touching the network.
    pub async fn run(mut self, text: &str) -> SessionOutcome {
        self.transition(Phase::Validating);

        if text.trim().is_empty() {
            self.transition(Phase::Rejected);
            return SessionOutcome::EmptyInput;
        }

        let Some(endpoint) = self.config.endpoint() else {
            self.transition(Phase::Rejected);
            log::error!("backend endpoint is not configured");
            return SessionOutcome::ConfigMissing;
        };
        let endpoint = endpoint.to_string();

        // The system prompt is only sent (and only budgeted) on the chat
        // protocol.
        let system_prompt = match self.protocol {
            Protocol::ChatCompletions => self.config.system_prompt.as_deref(),
            Protocol::Simple(_) => None,
        };
        let budget = estimate(text, system_prompt, self.config.max_tokens);
        if budget.is_exhausted() {
            self.transition(Phase::Rejected);
            log::info!(
                "submission rejected: {} estimated tokens leave {} remaining",
                budget.estimated_used,
                budget.remaining
            );
            return SessionOutcome::BudgetExceeded;
        }

        let request = PromptRequest {
            text: text.to_string(),
            system_prompt: system_prompt.map(str::to_string),
            model: Some(self.config.model.clone()),
        };
        let payload = OutboundPayload::build(&self.protocol, &request, &budget);

        self.transition(Phase::AwaitingConnection);
        match self.exchange(&endpoint, &payload).await {
            Ok(full_text) => {
                self.transition(Phase::Completed);
                SessionOutcome::Success(full_text)
            }
            Err(err) => {
                // Partial output already pushed to the sink stays visible.
                self.transition(Phase::Failed);
                log::error!("streaming request failed: {err}");
                SessionOutcome::TransportError(err.to_string())
            }
        }
    }

    async fn exchange(
        &mut self,
        endpoint: &str,
        payload: &OutboundPayload,
    ) -> Result<String, TransportError> {
        let url = format!("{}{}", endpoint, self.protocol.route());
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(STREAM_TIMEOUT)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }

        self.transition(Phase::Streaming);
        let source = self.protocol.delta_source();
        let label = self.protocol.label();

        // Pull the body one line at a time; each line is parsed and rendered
        // before the next is requested. Dropping the reader on any exit path
        // releases the connection.
        let mut lines =
            StreamReader::new(response.bytes_stream().map_err(std::io::Error::other)).lines();

        while let Some(line) = lines.next_line().await? {
            if line.is_empty() {
                continue;
            }
            let Some(frame) = parse_line(&line, source)? else {
                continue;
            };
            if frame.is_terminal {
                log::debug!("received stream terminator");
                break;
            }
            if let Some(delta) = &frame.delta {
                self.accumulated.push_str(delta);
                self.sink.render(label, &self.accumulated);
            }
        }

        Ok(std::mem::take(&mut self.accumulated))
    }

    fn transition(&mut self, next: Phase) {
        log::debug!("session phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}
