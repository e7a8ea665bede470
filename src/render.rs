//! Terminal output contract and default renderer.
//!
//! `ChatSink` is the rendering interface consumed by the router, the turn
//! controller, and the reporter; tests substitute a recording sink without
//! touching a real terminal. Everything that belongs to the transcript goes
//! to stdout and is flushed per write so streamed tokens and tool lines
//! interleave exactly in arrival order.

use crossterm::style::{Color, Stylize};
use std::io::{self, Write};

const TOOL_BANNER_WIDTH: usize = 54;
const TOOL_BANNER_HEADER: &str = "🔧 ─── Tools invoked ";

/// Injectable rendering interface for the chat transcript.
pub trait ChatSink: Send + Sync {
    /// Render the user input prompt chrome (no trailing newline).
    fn user_prompt(&self);
    /// Render the assistant reply prefix (no trailing newline).
    fn assistant_prefix(&self);
    /// Render one streamed reply fragment verbatim, flushing immediately.
    fn text_delta(&self, text: &str);
    /// Terminate the streamed reply block.
    fn stream_end(&self);
    /// Render a live tool-invocation line.
    fn tool_call(&self, name: &str, args: &str);
    /// Render one line of the post-turn tool summary.
    fn tool_summary_line(&self, name: &str, args: &str);
    /// Open the post-turn tool summary banner.
    fn tool_banner_open(&self);
    /// Close the post-turn tool summary banner.
    fn tool_banner_close(&self);
    /// Render a system/status line.
    fn system(&self, msg: &str);
    /// Render the session farewell.
    fn farewell(&self);
    /// Render an error line (stderr).
    fn error(&self, msg: &str);
}

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    /// Create a renderer with optional color output.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn print_flush(&self, text: &str) {
        let mut out = io::stdout();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn styled(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl ChatSink for Renderer {
    fn user_prompt(&self) {
        self.print_flush(&format!("{} ", self.styled("👤 You:", Color::Green)));
    }

    fn assistant_prefix(&self) {
        self.print_flush(&format!("\n{} ", self.styled("🤖 Agent:", Color::Blue)));
    }

    fn text_delta(&self, text: &str) {
        self.print_flush(text);
    }

    fn stream_end(&self) {
        self.print_flush("\n\n");
    }

    fn tool_call(&self, name: &str, args: &str) {
        let line = format!("🔧 Tool call: {name} → {args}");
        self.print_flush(&format!("\n{}\n", self.styled(&line, Color::Magenta)));
    }

    fn tool_summary_line(&self, name: &str, args: &str) {
        let tag = self.styled("🛠️ [TOOL]", Color::Magenta);
        self.print_flush(&format!("{tag} {name} → {args}\n"));
    }

    fn tool_banner_open(&self) {
        let banner = format!("\n{}", open_banner_text());
        self.print_flush(&format!("{}\n", self.styled(&banner, Color::Magenta)));
    }

    fn tool_banner_close(&self) {
        let rule = "─".repeat(TOOL_BANNER_WIDTH);
        self.print_flush(&format!("{}\n\n", self.styled(&rule, Color::Magenta)));
    }

    fn system(&self, msg: &str) {
        self.print_flush(&format!("{}\n", self.styled(msg, Color::Yellow)));
    }

    fn farewell(&self) {
        self.print_flush(&format!(
            "\n{} 👋 See you later!\n",
            self.styled("🤖 Agent:", Color::Blue)
        ));
    }

    fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{}", format!("error: {msg}").with(Color::Red).bold());
        } else {
            eprintln!("error: {msg}");
        }
    }
}

/// Header plus trailing rule, padded by character count so the line
/// lands on [`TOOL_BANNER_WIDTH`] despite the multi-byte glyphs.
fn open_banner_text() -> String {
    let pad = TOOL_BANNER_WIDTH.saturating_sub(TOOL_BANNER_HEADER.chars().count());
    format!("{TOOL_BANNER_HEADER}{}", "─".repeat(pad))
}
