//! Streaming event router.
//!
//! Consumes one run's event sequence in arrival order and dispatches by
//! kind: text deltas stream to the sink and accumulate into a transcript,
//! tool-call notices print one line on the tool channel, and every other
//! kind is skipped on purpose — tool *output* events exist upstream and
//! must never reach the terminal. The router knows nothing about prompts,
//! history, or traces.

use crate::error::RuntimeError;
use crate::render::ChatSink;
use crate::runtime::{format_arguments, Event, RunHandle};

/// Dispatches one run's events to a sink while accumulating reply text.
pub struct EventRouter<'a> {
    sink: &'a dyn ChatSink,
    transcript: String,
}

impl<'a> EventRouter<'a> {
    pub fn new(sink: &'a dyn ChatSink) -> Self {
        Self {
            sink,
            transcript: String::new(),
        }
    }

    /// Drain the run's event stream until it is exhausted.
    ///
    /// Returns the concatenation of every text delta seen, in arrival
    /// order. Stream-level failures propagate; they are fatal for the turn.
    pub async fn consume(mut self, run: &mut RunHandle) -> Result<String, RuntimeError> {
        while let Some(event) = run.next_event().await {
            match event? {
                Event::TextDelta { text } => {
                    self.sink.text_delta(&text);
                    self.transcript.push_str(&text);
                }
                Event::ToolCall { name, arguments } => {
                    self.sink.tool_call(&name, &format_arguments(&arguments));
                }
                Event::Other { kind } => {
                    tracing::trace!(kind = %kind, "skipping unhandled run event");
                }
            }
        }
        Ok(self.transcript)
    }
}
