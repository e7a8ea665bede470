//! CLI argument parsing via clap.

use clap::Parser;

/// A streaming terminal chat for a browser-driving agent over MCP.
#[derive(Debug, Parser)]
#[command(name = "webmate", version)]
pub struct Args {
    /// Number of user+assistant turn pairs kept in memory (minimum 1).
    #[arg(short = 'm', long = "mem")]
    pub mem: Option<i64>,

    /// Path to config file (default: ./webmate.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override the model name.
    #[arg(long = "model")]
    pub model: Option<String>,

    /// Override the API base URL.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    /// Remembered turn pairs if given on the command line, clamped to
    /// at least 1. Absent means the config file value stands.
    pub fn memory_turns(&self) -> Option<usize> {
        self.mem.map(|mem| mem.max(1) as usize)
    }
}
