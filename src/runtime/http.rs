//! HTTP/SSE client for the agent-runs endpoint.
//!
//! The runtime service owns model inference and tool execution; this client
//! only opens a streamed run and forwards its events in arrival order. A
//! reader task bridges the byte stream onto the run channels so the chat
//! loop consumes plain [`Event`]s.

use super::sse::{Frame, SseStream};
use super::{AgentRuntime, Event, RunFeed, RunHandle, SettledRun, TraceId};
use crate::config::Config;
use crate::error::RuntimeError;
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use std::time::Duration;

/// Connect timeout for opening a run. The stream itself has no deadline;
/// the step cap bounds runaway runs.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Production [`AgentRuntime`] backed by a streamed HTTP API.
pub struct HttpAgentRuntime {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    instructions: String,
    tool_server: String,
}

impl HttpAgentRuntime {
    /// Build a runtime client from resolved configuration.
    ///
    /// `instructions` is the agent instruction text loaded once at startup.
    pub fn new(config: &Config, instructions: String) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            api_key: config.api.api_key.clone(),
            model: config.api.model.clone(),
            instructions,
            tool_server: config.tool_server.name.clone(),
        }
    }
}

#[async_trait]
impl AgentRuntime for HttpAgentRuntime {
    async fn open_run(
        &self,
        prompt: &str,
        step_cap: u32,
        trace: &TraceId,
    ) -> Result<RunHandle, RuntimeError> {
        let body = json!({
            "model": self.model,
            "instructions": self.instructions,
            "input": prompt,
            "max_steps": step_cap,
            "stream": true,
            "trace_id": trace.as_str(),
            "tools": [{"type": "mcp", "server_label": self.tool_server}],
        });

        let mut request = self
            .http
            .post(format!("{}/responses", self.base_url))
            .json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RuntimeError::Status(status.as_u16(), body));
        }

        let (feed, handle) = RunHandle::channel();
        tokio::spawn(read_run_stream(response, feed));
        Ok(handle)
    }
}

/// Drain the SSE byte stream into the run channels.
async fn read_run_stream(response: reqwest::Response, feed: RunFeed) {
    let mut bytes = response.bytes_stream();
    let mut parser = SseStream::new();
    let mut settled: Option<SettledRun> = None;

    while let Some(chunk) = bytes.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                tracing::warn!(error = %err, "run event stream broke mid-flight");
                feed.fail(RuntimeError::Stream(err.to_string()));
                return;
            }
        };
        for frame in parser.push(&chunk) {
            if !forward_frame(&feed, frame, &mut settled) {
                return;
            }
        }
    }

    if let Some(frame) = parser.finish() {
        if !forward_frame(&feed, frame, &mut settled) {
            return;
        }
    }

    // Dropping the feed without settling signals SettledUnavailable.
    if let Some(settled) = settled {
        feed.settle(settled);
    }
}

fn forward_frame(feed: &RunFeed, frame: Frame, settled: &mut Option<SettledRun>) -> bool {
    match frame {
        Frame::Event(event) => {
            if let Event::Other { kind } = &event {
                tracing::trace!(kind = %kind, "passing through unhandled event kind");
            }
            feed.event(event)
        }
        Frame::Completed(payload) => {
            *settled = Some(payload);
            true
        }
    }
}
