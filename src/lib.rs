//! Webmate — a streaming terminal chat client for a browser-capable agent.
//!
//! The agent runtime executes browser-automation tools through an MCP
//! subprocess; this crate owns the conversation loop. It streams the
//! assistant's reply token-by-token, announces tool invocations as they
//! happen (never their output), and keeps a bounded sliding window of
//! conversation memory.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use webmate::config::{load_config, load_instructions};
//! use webmate::render::Renderer;
//! use webmate::runtime::http::HttpAgentRuntime;
//! use webmate::session::ChatSession;
//! use webmate::turn::TurnController;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let instructions = load_instructions(&config).unwrap();
//! let runtime = Arc::new(HttpAgentRuntime::new(&config, instructions));
//! let controller = TurnController::new(runtime, config.memory_turns);
//! let mut session = ChatSession::new(controller);
//! session.run(&Renderer::new(true)).await.unwrap();
//! # }
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod mcp;
pub mod preflight;
pub mod prompt;
pub mod render;
pub mod report;
pub mod router;
pub mod runtime;
pub mod session;
#[cfg(test)]
pub mod testsupport;
pub mod turn;
