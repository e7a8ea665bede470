//! Post-turn tool-call reporting.
//!
//! After a run settles, this module prints a bordered summary of every tool
//! invocation the runtime recorded — names and arguments only, never
//! output. Streamed-only outcomes expose no call list and print nothing,
//! as does an empty list: no banner without content.

use crate::render::ChatSink;
use crate::runtime::ToolCallRecord;
use crate::turn::RunOutcome;
use serde_json::Value;

/// Print the tool-call summary for a completed turn, if there is one.
///
/// Calls are located in priority order: the settled run's flat call list
/// first, then its action/observation step pairs (taking the leading
/// element of each pair). Per-call extraction failures degrade to a
/// stringified entry instead of aborting the report.
pub fn report_tool_calls(sink: &dyn ChatSink, outcome: &RunOutcome) {
    let RunOutcome::Settled(settled) = outcome else {
        return;
    };

    let calls: Vec<Value> = if !settled.tool_calls.is_empty() {
        settled.tool_calls.clone()
    } else if !settled.intermediate_steps.is_empty() {
        settled.intermediate_steps.iter().map(step_call).collect()
    } else {
        return;
    };

    sink.tool_banner_open();
    for call in &calls {
        let record = ToolCallRecord::from_reported(call);
        sink.tool_summary_line(&record.name, &record.arguments_display());
    }
    sink.tool_banner_close();
}

/// Reduce one intermediate step to its call half.
///
/// Steps arrive as `[action, observation]` pairs; a non-pair entry is
/// taken as the call itself.
fn step_call(step: &Value) -> Value {
    match step.as_array().and_then(|pair| pair.first()) {
        Some(action) => action.clone(),
        None => step.clone(),
    }
}
