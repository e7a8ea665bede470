//! Agent-runtime boundary.
//!
//! The runtime that actually drives the model and executes tools lives on
//! the other side of this interface; the chat core only opens runs and
//! consumes their ordered event streams. [`HttpAgentRuntime`] is the
//! production implementation; tests script runs through the same channels.
//!
//! [`HttpAgentRuntime`]: http::HttpAgentRuntime

use crate::error::RuntimeError;
use async_trait::async_trait;
use rand::Rng;
use serde_json::{Map, Value};
use std::fmt;
use tokio::sync::{mpsc, oneshot};

pub mod http;
pub(crate) mod sse;

/// Opaque correlation token generated fresh for every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a new `trace_<32 hex>` token.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let hex: String = (0..32)
            .map(|_| char::from_digit(rng.gen_range(0..16u32), 16).unwrap_or('0'))
            .collect();
        Self(format!("trace_{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit of a run's live output stream.
///
/// The wire union is open: kinds this client does not handle (lifecycle
/// markers, tool *output* payloads) decode to [`Event::Other`] and are
/// skipped by the router instead of failing the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Incremental fragment of the assistant's reply, in arrival order.
    TextDelta { text: String },
    /// A tool invocation started. Carries name and arguments, never output.
    ToolCall {
        name: String,
        arguments: Map<String, Value>,
    },
    /// Any unhandled event kind.
    Other { kind: String },
}

/// Definitive result of a finished run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettledRun {
    /// The fully-formed assistant reply.
    pub output_text: String,
    /// Tool invocations as reported by the runtime, in call order.
    pub tool_calls: Vec<Value>,
    /// Action/observation step pairs, for runtimes that report those
    /// instead of a flat call list.
    pub intermediate_steps: Vec<Value>,
}

/// Live handle to one run: an ordered event stream plus a settled result.
pub struct RunHandle {
    events: mpsc::UnboundedReceiver<Result<Event, RuntimeError>>,
    settled: oneshot::Receiver<SettledRun>,
}

/// Producer side of a [`RunHandle`], owned by the runtime's reader task.
pub struct RunFeed {
    events: mpsc::UnboundedSender<Result<Event, RuntimeError>>,
    settled: oneshot::Sender<SettledRun>,
}

impl RunHandle {
    /// Create a connected feed/handle pair.
    pub fn channel() -> (RunFeed, RunHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = oneshot::channel();
        (
            RunFeed {
                events: event_tx,
                settled: settled_tx,
            },
            RunHandle {
                events: event_rx,
                settled: settled_rx,
            },
        )
    }

    /// Next event in arrival order; `None` when the stream is exhausted.
    pub async fn next_event(&mut self) -> Option<Result<Event, RuntimeError>> {
        self.events.recv().await
    }

    /// Wait for the run's settled result.
    ///
    /// Fails with [`RuntimeError::SettledUnavailable`] when the runtime
    /// finished the stream without one; callers fall back to the text they
    /// accumulated from deltas.
    pub async fn settled_result(self) -> Result<SettledRun, RuntimeError> {
        self.settled
            .await
            .map_err(|_| RuntimeError::SettledUnavailable)
    }
}

impl RunFeed {
    /// Forward one event. Returns false when the consumer is gone.
    pub fn event(&self, event: Event) -> bool {
        self.events.send(Ok(event)).is_ok()
    }

    /// Forward a stream failure to the consumer.
    pub fn fail(&self, error: RuntimeError) {
        let _ = self.events.send(Err(error));
    }

    /// Deliver the settled result and close the feed.
    pub fn settle(self, settled: SettledRun) {
        let _ = self.settled.send(settled);
    }
}

/// A runtime capable of executing one prompt as a traced, streamed run.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Open a run for `prompt`, capped at `step_cap` internal agent steps.
    async fn open_run(
        &self,
        prompt: &str,
        step_cap: u32,
        trace: &TraceId,
    ) -> Result<RunHandle, RuntimeError>;
}

/// Display-only record of one tool invocation.
///
/// Extraction from heterogeneous call objects is best-effort with a fixed
/// field priority per source; it never fails, it degrades to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRecord {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolCallRecord {
    /// Decode a live tool-call notice item.
    ///
    /// Name: `"tool"`, then `"name"`, else empty. Arguments: `"tool_input"`,
    /// then `"arguments"`, else empty mapping.
    pub fn from_notice(item: &Value) -> Self {
        Self {
            name: string_field(item, &["tool", "name"]).unwrap_or_default(),
            arguments: arguments_field(item, &["tool_input", "arguments"]),
        }
    }

    /// Decode one entry of a settled run's call list.
    ///
    /// Name: `"tool"`, then `"name"`, else the stringified call. Arguments:
    /// `"tool_input"`, then `"args"`, else empty mapping.
    pub fn from_reported(call: &Value) -> Self {
        Self {
            name: string_field(call, &["tool", "name"]).unwrap_or_else(|| stringify(call)),
            arguments: arguments_field(call, &["tool_input", "args"]),
        }
    }

    /// Compact JSON rendering of the arguments for display.
    pub fn arguments_display(&self) -> String {
        format_arguments(&self.arguments)
    }
}

/// Compact JSON rendering of an argument mapping.
pub fn format_arguments(arguments: &Map<String, Value>) -> String {
    Value::Object(arguments.clone()).to_string()
}

fn string_field(value: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| value.get(field))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn arguments_field(value: &Value, fields: &[&str]) -> Map<String, Value> {
    let Some(raw) = fields.iter().find_map(|field| value.get(field)) else {
        return Map::new();
    };
    match raw {
        Value::Object(map) => map.clone(),
        // Some runtimes serialize arguments as a JSON-encoded string.
        Value::String(text) => serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|parsed| parsed.as_object().cloned())
            .unwrap_or_default(),
        _ => Map::new(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trace_ids_are_fresh_and_well_formed() {
        let a = TraceId::generate();
        let b = TraceId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("trace_"));
        assert_eq!(a.as_str().len(), "trace_".len() + 32);
        assert!(a.as_str()["trace_".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn notice_prefers_tool_field_over_name() {
        let record = ToolCallRecord::from_notice(&json!({
            "tool": "browser_navigate",
            "name": "ignored",
            "tool_input": {"url": "https://example.com"},
        }));
        assert_eq!(record.name, "browser_navigate");
        assert_eq!(record.arguments_display(), r#"{"url":"https://example.com"}"#);
    }

    #[test]
    fn notice_falls_back_to_name_and_arguments_fields() {
        let record = ToolCallRecord::from_notice(&json!({
            "name": "browser_click",
            "arguments": {"selector": "#login"},
        }));
        assert_eq!(record.name, "browser_click");
        assert_eq!(record.arguments.get("selector"), Some(&json!("#login")));
    }

    #[test]
    fn malformed_notice_degrades_to_empty_defaults() {
        let record = ToolCallRecord::from_notice(&json!({"id": "call_1"}));
        assert_eq!(record.name, "");
        assert!(record.arguments.is_empty());
    }

    #[test]
    fn json_string_arguments_are_decoded() {
        let record = ToolCallRecord::from_notice(&json!({
            "name": "browser_type",
            "arguments": "{\"text\":\"hello\"}",
        }));
        assert_eq!(record.arguments.get("text"), Some(&json!("hello")));
    }

    #[test]
    fn reported_call_without_fields_stringifies() {
        let record = ToolCallRecord::from_reported(&json!("raw-action"));
        assert_eq!(record.name, "raw-action");
        assert!(record.arguments.is_empty());
    }

    #[test]
    fn reported_call_uses_args_not_arguments() {
        let record = ToolCallRecord::from_reported(&json!({
            "name": "browser_snapshot",
            "args": {"full_page": true},
        }));
        assert_eq!(record.arguments.get("full_page"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn run_handle_preserves_event_order() {
        let (feed, mut handle) = RunHandle::channel();
        feed.event(Event::TextDelta { text: "a".into() });
        feed.event(Event::Other {
            kind: "response.tool_call_output".into(),
        });
        feed.event(Event::TextDelta { text: "b".into() });
        drop(feed);

        let mut seen = Vec::new();
        while let Some(event) = handle.next_event().await {
            seen.push(event.unwrap());
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], Event::TextDelta { text: "a".into() });
        assert_eq!(seen[2], Event::TextDelta { text: "b".into() });
    }

    #[tokio::test]
    async fn dropped_feed_means_settled_unavailable() {
        let (feed, handle) = RunHandle::channel();
        drop(feed);
        match handle.settled_result().await {
            Err(RuntimeError::SettledUnavailable) => {}
            other => panic!("expected SettledUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn settled_result_delivers_payload() {
        let (feed, handle) = RunHandle::channel();
        feed.settle(SettledRun {
            output_text: "done".into(),
            ..SettledRun::default()
        });
        let settled = handle.settled_result().await.unwrap();
        assert_eq!(settled.output_text, "done");
    }
}
