//! Shared test fixtures: a recording sink and a scripted runtime.
//!
//! Kept std/tokio-only so unit tests across modules can exercise the full
//! turn pipeline without a terminal or a network.

use crate::error::RuntimeError;
use crate::render::ChatSink;
use crate::runtime::{AgentRuntime, Event, RunHandle, SettledRun, ToolCallRecord, TraceId};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One observable effect on the recording sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Delta(String),
    ToolCall { name: String, args: String },
    SummaryLine { name: String, args: String },
    BannerOpen,
    BannerClose,
    System(String),
    Farewell,
    Error(String),
}

/// `ChatSink` that records transcript-bearing effects for assertions.
///
/// Prompt chrome (user/assistant prefixes, stream terminators) is not
/// recorded; tests assert on content, not spacing.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: SinkEvent) {
        self.events.lock().expect("sink lock").push(event);
    }

    /// Everything recorded so far, in emission order.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().expect("sink lock").clone()
    }

    /// Concatenation of all recorded deltas.
    pub fn streamed_text(&self) -> String {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Delta(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl ChatSink for RecordingSink {
    fn user_prompt(&self) {}

    fn assistant_prefix(&self) {}

    fn text_delta(&self, text: &str) {
        self.record(SinkEvent::Delta(text.to_string()));
    }

    fn stream_end(&self) {}

    fn tool_call(&self, name: &str, args: &str) {
        self.record(SinkEvent::ToolCall {
            name: name.to_string(),
            args: args.to_string(),
        });
    }

    fn tool_summary_line(&self, name: &str, args: &str) {
        self.record(SinkEvent::SummaryLine {
            name: name.to_string(),
            args: args.to_string(),
        });
    }

    fn tool_banner_open(&self) {
        self.record(SinkEvent::BannerOpen);
    }

    fn tool_banner_close(&self) {
        self.record(SinkEvent::BannerClose);
    }

    fn system(&self, msg: &str) {
        self.record(SinkEvent::System(msg.to_string()));
    }

    fn farewell(&self) {
        self.record(SinkEvent::Farewell);
    }

    fn error(&self, msg: &str) {
        self.record(SinkEvent::Error(msg.to_string()));
    }
}

/// Script for one run: its event sequence and optional settled result.
#[derive(Debug, Clone)]
pub struct RunScript {
    pub events: Vec<Event>,
    pub settled: Option<SettledRun>,
}

/// `AgentRuntime` that replays scripted runs and records opened prompts.
#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    scripts: Mutex<VecDeque<RunScript>>,
    prompts: Mutex<Vec<String>>,
    open_error: Mutex<Option<RuntimeError>>,
}

impl ScriptedRuntime {
    pub fn new(scripts: Vec<RunScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            ..Self::default()
        }
    }

    /// Runtime whose next `open_run` fails with `error`.
    pub fn failing(error: RuntimeError) -> Self {
        Self {
            open_error: Mutex::new(Some(error)),
            ..Self::default()
        }
    }

    /// Prompts passed to `open_run`, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt lock").clone()
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    async fn open_run(
        &self,
        prompt: &str,
        _step_cap: u32,
        _trace: &TraceId,
    ) -> Result<RunHandle, RuntimeError> {
        if let Some(error) = self.open_error.lock().expect("error lock").take() {
            return Err(error);
        }

        self.prompts
            .lock()
            .expect("prompt lock")
            .push(prompt.to_string());

        let script = self
            .scripts
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(RunScript {
                events: vec![],
                settled: None,
            });

        let (feed, handle) = RunHandle::channel();
        for event in script.events {
            feed.event(event);
        }
        match script.settled {
            Some(settled) => feed.settle(settled),
            None => drop(feed),
        }
        Ok(handle)
    }
}

/// Build a live tool-call event the way the wire decoder would.
pub fn tool_call_event(name: &str, args: &[(&str, &str)]) -> Event {
    let mut item = json!({"name": name, "arguments": {}});
    for (key, value) in args {
        item["arguments"][key] = Value::String((*value).to_string());
    }
    let record = ToolCallRecord::from_notice(&item);
    Event::ToolCall {
        name: record.name,
        arguments: record.arguments,
    }
}
