//! Startup preflight validation.
//!
//! These checks run before any chat state exists so common environment and
//! configuration mistakes surface as actionable fatal errors instead of
//! mid-session failures.

use crate::config::Config;
use std::env;
use std::path::{Path, PathBuf};

/// Verify the tool-server launcher binary resolves on `PATH`.
pub fn ensure_launcher_available(command: &str) -> Result<(), String> {
    if resolve_on_path(command).is_some() {
        return Ok(());
    }
    Err(format!(
        "`{command}` was not found on PATH. The browser tool server is launched \
         through it; install Node.js (which provides npx) or point \
         `tool_server.command` in webmate.toml at an available launcher."
    ))
}

/// Validate that the active configuration can open runs at all.
pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.api.model.trim().is_empty() {
        return Err("no model configured. Set `api.model` in webmate.toml or WEBMATE_MODEL.".into());
    }

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        return Err(
            "no API base URL configured. Set `api.base_url` in webmate.toml or WEBMATE_BASE_URL."
                .into(),
        );
    }
    let parsed = reqwest::Url::parse(base_url)
        .map_err(|err| format!("invalid api.base_url `{base_url}`: {err}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(format!(
                "invalid api.base_url `{base_url}`: unsupported scheme `{other}` (expected http or https)"
            ));
        }
    }
    if parsed.host_str().is_none() {
        return Err(format!("invalid api.base_url `{base_url}`: missing host"));
    }

    if config.tool_server.command.trim().is_empty() {
        return Err("`tool_server.command` resolved to an empty launcher".into());
    }

    Ok(())
}

fn resolve_on_path(command: &str) -> Option<PathBuf> {
    let candidate = Path::new(command);
    // Explicit paths bypass the PATH scan.
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(command))
        .find(|full| is_executable(full))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
