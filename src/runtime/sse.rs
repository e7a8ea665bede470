//! Incremental SSE framing and event decoding for streamed runs.
//!
//! The runtime streams `data: <json>` lines. Payload JSON carries a `type`
//! discriminator; kinds this client does not render decode to
//! [`Event::Other`] so the union stays open from the consumer's side.

use super::{Event, SettledRun, ToolCallRecord};
use serde_json::Value;

/// One decoded SSE frame.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Frame {
    /// A live event for the router.
    Event(Event),
    /// The terminal frame carrying the settled run payload.
    Completed(SettledRun),
}

/// Splits an arriving byte stream into SSE data lines.
///
/// Chunk boundaries are arbitrary, so a partial trailing line is buffered
/// across calls to [`SseStream::push`].
#[derive(Debug, Default)]
pub(crate) struct SseStream {
    buffer: Vec<u8>,
}

impl SseStream {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk; returns every frame completed by it.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        // Buffer raw bytes: a chunk boundary can land inside a multi-byte
        // character, so decoding waits until the line is complete.
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(frame) = decode_line(line.trim_end_matches(['\r', '\n'])) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush a final unterminated line after the transport closes.
    pub(crate) fn finish(self) -> Option<Frame> {
        let rest = String::from_utf8_lossy(&self.buffer);
        decode_line(rest.trim_end_matches(['\r', '\n']))
    }
}

fn decode_line(line: &str) -> Option<Frame> {
    // SSE comments start with ':'; blank lines separate events.
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    let payload = line.strip_prefix("data:")?.trim_start();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }
    let Ok(payload) = serde_json::from_str::<Value>(payload) else {
        tracing::trace!(line = %line, "ignoring undecodable SSE payload");
        return None;
    };
    Some(decode_payload(&payload))
}

/// Map one JSON event payload onto the open event union.
pub(crate) fn decode_payload(payload: &Value) -> Frame {
    let kind = payload
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    match kind {
        "response.output_text.delta" => match payload.get("delta").and_then(Value::as_str) {
            Some(delta) => Frame::Event(Event::TextDelta {
                text: delta.to_string(),
            }),
            None => Frame::Event(Event::Other {
                kind: kind.to_string(),
            }),
        },
        "response.tool_call" => {
            let item = payload.get("item").cloned().unwrap_or(Value::Null);
            let record = ToolCallRecord::from_notice(&item);
            Frame::Event(Event::ToolCall {
                name: record.name,
                arguments: record.arguments,
            })
        }
        "response.completed" => Frame::Completed(decode_settled(payload.get("response"))),
        other => Frame::Event(Event::Other {
            kind: other.to_string(),
        }),
    }
}

fn decode_settled(response: Option<&Value>) -> SettledRun {
    let Some(response) = response else {
        return SettledRun::default();
    };
    SettledRun {
        output_text: response
            .get("output_text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        tool_calls: array_field(response, "tool_calls"),
        intermediate_steps: array_field(response, "intermediate_steps"),
    }
}

fn array_field(value: &Value, field: &str) -> Vec<Value> {
    value
        .get(field)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
