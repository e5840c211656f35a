//! SSE-style stream frame parsing.
//!
//! The transport hands over decoded text lines; each `data: ` line carries one
//! JSON-encoded increment of the streamed reply, terminated by a literal
//! `[DONE]` sentinel. Envelope decoding is behind the [`DeltaSource`] trait
//! with one implementation per protocol, so callers never branch on shape.

use serde::Deserialize;
use thiserror::Error;

/// Prefix marking an SSE data line. Lines without it are not data frames.
pub const DATA_PREFIX: &str = "data: ";

/// Authoritative end-of-stream sentinel, independent of transport EOF.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded unit from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    pub is_terminal: bool,
    pub delta: Option<String>,
    pub raw: String,
}

impl StreamFrame {
    fn terminal(raw: &str) -> Self {
        Self {
            is_terminal: true,
            delta: None,
            raw: raw.to_string(),
        }
    }

    fn with_delta(raw: &str, delta: String) -> Self {
        Self {
            is_terminal: false,
            delta: Some(delta),
            raw: raw.to_string(),
        }
    }
}

/// Malformed JSON inside a `data:` frame.
///
/// Fatal for the whole session: the request aborts rather than skipping the
/// line.
#[derive(Debug, Error)]
#[error("malformed frame payload {data:?}: {source}")]
pub struct FrameParseError {
    pub data: String,
    #[source]
    pub source: serde_json::Error,
}

/// Extracts the text delta from one protocol's JSON envelope.
pub trait DeltaSource: Send + Sync {
    /// `Ok(None)` means the frame carries no delta, which is not an error.
    fn delta_from(&self, data: &str) -> Result<Option<String>, FrameParseError>;
}

/// `{"delta": "..."}` envelopes from the bespoke backend.
pub struct SimpleDeltaSource;

#[derive(Debug, Deserialize)]
struct SimpleEnvelope {
    delta: Option<String>,
}

impl DeltaSource for SimpleDeltaSource {
    fn delta_from(&self, data: &str) -> Result<Option<String>, FrameParseError> {
        let envelope: SimpleEnvelope =
            serde_json::from_str(data).map_err(|source| FrameParseError {
                data: data.to_string(),
                source,
            })?;
        Ok(envelope.delta)
    }
}

/// OpenAI-compatible `choices[0].delta.content` envelopes.
///
/// Every nesting level is optional: empty `choices` or a missing key yields
/// "no delta this frame", never an error.
pub struct ChatDeltaSource;

#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    delta: ChatChoiceDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChatChoiceDelta {
    content: Option<String>,
}

impl DeltaSource for ChatDeltaSource {
    fn delta_from(&self, data: &str) -> Result<Option<String>, FrameParseError> {
        let envelope: ChatEnvelope =
            serde_json::from_str(data).map_err(|source| FrameParseError {
                data: data.to_string(),
                source,
            })?;
        Ok(envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content))
    }
}

/// Parse one transport line into at most one frame.
///
/// - lines without the `data: ` prefix (comments, keep-alives) yield `None`;
/// - `data: [DONE]` yields a terminal frame;
/// - frames whose delta is absent or empty yield `None`;
/// - malformed JSON on a `data:` line is an error.
///
/// Stateless per call: re-parsing the same line gives the same result.
pub fn parse_line(
    line: &str,
    source: &dyn DeltaSource,
) -> Result<Option<StreamFrame>, FrameParseError> {
    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };

    if data == DONE_SENTINEL {
        return Ok(Some(StreamFrame::terminal(line)));
    }

    match source.delta_from(data)? {
        Some(delta) if !delta.is_empty() => Ok(Some(StreamFrame::with_delta(line, delta))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_data_lines_are_ignored() {
        assert_eq!(parse_line(": keep-alive", &SimpleDeltaSource).unwrap(), None);
        assert_eq!(parse_line("event: token", &SimpleDeltaSource).unwrap(), None);
        assert_eq!(parse_line("", &ChatDeltaSource).unwrap(), None);
    }

    #[test]
    fn done_sentinel_yields_terminal_frame() {
        let frame = parse_line("data: [DONE]", &SimpleDeltaSource)
            .unwrap()
            .expect("terminal frame");
        assert!(frame.is_terminal);
        assert_eq!(frame.delta, None);
    }

    #[test]
    fn simple_envelope_delta() {
        let frame = parse_line(r#"data: {"delta":"hello"}"#, &SimpleDeltaSource)
            .unwrap()
            .expect("delta frame");
        assert!(!frame.is_terminal);
        assert_eq!(frame.delta.as_deref(), Some("hello"));
    }

    #[test]
    fn simple_envelope_without_delta_yields_nothing() {
        assert_eq!(
            parse_line(r#"data: {"other":"field"}"#, &SimpleDeltaSource).unwrap(),
            None
        );
        assert_eq!(
            parse_line(r#"data: {"delta":""}"#, &SimpleDeltaSource).unwrap(),
            None
        );
    }

    #[test]
    fn chat_envelope_content_delta() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hi"}}]}"#;
        let frame = parse_line(line, &ChatDeltaSource).unwrap().expect("delta frame");
        assert_eq!(frame.delta.as_deref(), Some("Hi"));
        assert_eq!(frame.raw, line);
    }

    #[test]
    fn chat_envelope_empty_choices_yields_nothing() {
        assert_eq!(
            parse_line(r#"data: {"choices":[]}"#, &ChatDeltaSource).unwrap(),
            None
        );
    }

    #[test]
    fn chat_envelope_missing_keys_yield_nothing() {
        assert_eq!(parse_line(r#"data: {}"#, &ChatDeltaSource).unwrap(), None);
        assert_eq!(
            parse_line(r#"data: {"choices":[{}]}"#, &ChatDeltaSource).unwrap(),
            None
        );
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{}}]}"#, &ChatDeltaSource).unwrap(),
            None
        );
        assert_eq!(
            parse_line(
                r#"data: {"choices":[{"delta":{"content":null}}]}"#,
                &ChatDeltaSource
            )
            .unwrap(),
            None
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_line("data: not-json", &SimpleDeltaSource).unwrap_err();
        assert_eq!(err.data, "not-json");

        assert!(parse_line("data: {broken", &ChatDeltaSource).is_err());
    }

    #[test]
    fn parsing_is_idempotent() {
        let line = r#"data: {"delta":"again"}"#;
        let first = parse_line(line, &SimpleDeltaSource).unwrap();
        let second = parse_line(line, &SimpleDeltaSource).unwrap();
        assert_eq!(first, second);
    }
}
