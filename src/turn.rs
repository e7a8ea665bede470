//! Turn controller.
//!
//! Drives one full request/response cycle: compose the prompt from history,
//! open a traced run against the agent runtime, route the event stream,
//! reconcile the settled result, report tool calls, and record the finished
//! turn pair. Turns are strictly sequential; history is only written after
//! a turn fully completes, so a failed turn records nothing.

use crate::error::ChatError;
use crate::history::{History, Turn};
use crate::prompt::compose;
use crate::render::ChatSink;
use crate::report::report_tool_calls;
use crate::router::EventRouter;
use crate::runtime::{AgentRuntime, SettledRun, TraceId};
use std::sync::Arc;
use tracing::Instrument;

/// Cap on agent-internal steps per run, guarding against runaway tool loops.
pub const MAX_RUN_STEPS: u32 = 20;

/// Workflow label attached to every turn's trace span.
pub const WORKFLOW_NAME: &str = "mcp-web-chat";

/// How a turn's reply text was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The runtime produced a definitive settled result. Preferred: it is a
    /// well-formed complete message even if the delta stream lost characters
    /// to formatting tokens.
    Settled(SettledRun),
    /// No settled result was available; the reply is the concatenation of
    /// the streamed deltas.
    StreamedOnly(String),
}

impl RunOutcome {
    /// The assistant reply text recorded into history.
    pub fn reply_text(&self) -> &str {
        match self {
            Self::Settled(settled) => &settled.output_text,
            Self::StreamedOnly(text) => text,
        }
    }
}

/// Orchestrates one turn at a time against the agent runtime.
pub struct TurnController {
    runtime: Arc<dyn AgentRuntime>,
    history: History,
}

impl TurnController {
    /// Create a controller remembering `memory_turns` user/assistant pairs.
    pub fn new(runtime: Arc<dyn AgentRuntime>, memory_turns: usize) -> Self {
        Self {
            runtime,
            history: History::with_remembered_turns(memory_turns),
        }
    }

    /// Run one full turn for `user_input`.
    ///
    /// Streams the reply through `sink` as it arrives. Errors while opening
    /// or iterating the run propagate; the only tolerated degradation is a
    /// missing settled result, which falls back to the streamed text.
    pub async fn run_turn(&mut self, sink: &dyn ChatSink, user_input: &str) -> Result<(), ChatError> {
        // Composition reads the pre-append history; eviction happens only
        // when the finished pair is recorded.
        let prompt = compose(&self.history.snapshot(), user_input);
        let trace = TraceId::generate();
        let span =
            tracing::info_span!("chat_turn", workflow = WORKFLOW_NAME, trace_id = %trace);

        let outcome = async {
            let mut run = self.runtime.open_run(&prompt, MAX_RUN_STEPS, &trace).await?;

            sink.assistant_prefix();
            let transcript = EventRouter::new(sink).consume(&mut run).await?;
            sink.stream_end();

            let outcome = match run.settled_result().await {
                Ok(settled) => RunOutcome::Settled(settled),
                // The runtime could not settle; the streamed text stands in.
                Err(_) => RunOutcome::StreamedOnly(transcript),
            };
            Ok::<_, ChatError>(outcome)
        }
        .instrument(span)
        .await?;

        report_tool_calls(sink, &outcome);

        self.history.push(Turn::user(user_input));
        self.history.push(Turn::assistant(outcome.reply_text()));
        Ok(())
    }

    /// The controller's conversation memory.
    pub fn history(&self) -> &History {
        &self.history
    }
}
