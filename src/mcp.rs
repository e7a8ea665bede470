//! MCP tool-server subprocess lifecycle.
//!
//! The browser-automation server is launched once at startup and lives for
//! the whole session. The chat core never speaks its protocol; it only
//! hears about tool activity through run events. Teardown is guaranteed on
//! every exit path: the child is spawned with kill-on-drop, and the normal
//! path shuts it down explicitly.

use crate::config::ToolServerConfig;
use crate::error::ChatError;
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Handle to the running tool-server subprocess.
#[derive(Debug)]
pub struct ToolServer {
    name: String,
    child: Child,
}

impl ToolServer {
    /// Launch the configured server process with piped stdio.
    ///
    /// The stdin pipe is held open for the lifetime of the handle; MCP
    /// stdio servers exit when it closes.
    pub async fn start(config: &ToolServerConfig) -> Result<Self, ChatError> {
        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|err| {
            ChatError::ToolServer(format!(
                "failed to launch `{}`: {err}",
                config.command
            ))
        })?;

        tracing::info!(server = %config.name, command = %config.command, "tool server started");
        Ok(Self {
            name: config.name.clone(),
            child,
        })
    }

    /// Label the runtime uses to address this server.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Terminate the subprocess and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Err(err) = self.child.kill().await {
            tracing::debug!(server = %self.name, error = %err, "tool server already gone");
            return;
        }
        let _ = self.child.wait().await;
        tracing::info!(server = %self.name, "tool server stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolServerConfig;

    fn sleeper() -> ToolServerConfig {
        ToolServerConfig {
            name: "sleep-server".into(),
            command: "sleep".into(),
            args: vec!["30".into()],
        }
    }

    #[tokio::test]
    async fn start_and_shutdown_round_trip() {
        let server = ToolServer::start(&sleeper()).await.expect("spawn sleep");
        assert_eq!(server.name(), "sleep-server");
        server.shutdown().await;
    }

    #[tokio::test]
    async fn missing_binary_is_a_tool_server_error() {
        let config = ToolServerConfig {
            name: "ghost".into(),
            command: "definitely-not-a-real-binary-xyz".into(),
            args: vec![],
        };
        let err = ToolServer::start(&config).await.unwrap_err();
        assert!(matches!(err, ChatError::ToolServer(_)), "got: {err}");
    }
}
