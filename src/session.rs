//! Interactive session loop.
//!
//! Reads one line at a time, recognizes exit keywords, and hands everything
//! else to the turn controller for exactly one full turn. The blocking
//! stdin read runs on the blocking pool so it never starves streaming
//! output elsewhere on the runtime.

use crate::error::ChatError;
use crate::render::ChatSink;
use crate::turn::TurnController;

/// Case-insensitive keywords that end the session.
const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "salir"];

/// What to do with one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    /// End the session.
    Exit,
    /// Blank input; re-prompt without consuming a turn.
    Skip,
    /// Run one turn with this input.
    Turn(String),
}

/// Classify one raw input line.
pub fn classify_line(line: &str) -> LineAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineAction::Skip;
    }
    if EXIT_KEYWORDS
        .iter()
        .any(|keyword| trimmed.eq_ignore_ascii_case(keyword))
    {
        return LineAction::Exit;
    }
    LineAction::Turn(trimmed.to_string())
}

/// Top-level read-eval loop over a turn controller.
pub struct ChatSession {
    controller: TurnController,
}

impl ChatSession {
    pub fn new(controller: TurnController) -> Self {
        Self { controller }
    }

    /// Run the session until an exit keyword, end of input, or a fatal
    /// turn error. Turn errors propagate; this is a best-effort interactive
    /// tool, not a resilient service.
    pub async fn run(&mut self, sink: &dyn ChatSink) -> Result<(), ChatError> {
        loop {
            sink.user_prompt();
            let Some(line) = read_input_line().await? else {
                sink.farewell();
                break;
            };
            match classify_line(&line) {
                LineAction::Skip => continue,
                LineAction::Exit => {
                    sink.farewell();
                    break;
                }
                LineAction::Turn(input) => {
                    self.controller.run_turn(sink, &input).await?;
                }
            }
        }
        Ok(())
    }
}

/// Read one line from stdin off the async runtime's critical path.
///
/// Returns `None` at end of input (ctrl-d / closed stdin).
async fn read_input_line() -> Result<Option<String>, ChatError> {
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line)),
            Err(err) => Err(err),
        }
    })
    .await
    .map_err(|err| ChatError::Io(std::io::Error::other(err)))??;
    Ok(line)
}
