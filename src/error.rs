//! Unified error types for the chat client.

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// RuntimeError
// ---------------------------------------------------------------------------

/// Errors from the agent-runtime boundary.
#[derive(Debug)]
pub enum RuntimeError {
    /// Network / reqwest-level error while opening a run.
    Http(reqwest::Error),
    /// Non-2xx status from the runtime endpoint.
    Status(u16, String),
    /// The run's event stream broke mid-flight.
    Stream(String),
    /// The runtime finished without producing a settled result.
    ///
    /// Tolerated by the turn controller, which falls back to the
    /// accumulated streamed text.
    SettledUnavailable,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::Stream(msg) => write!(f, "event stream failed: {msg}"),
            Self::SettledUnavailable => write!(f, "run produced no settled result"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<reqwest::Error> for RuntimeError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// ChatError — top-level
// ---------------------------------------------------------------------------

/// Top-level error type for the chat session.
#[derive(Debug)]
pub enum ChatError {
    Config(ConfigError),
    Runtime(RuntimeError),
    /// The tool-server subprocess failed to launch.
    ToolServer(String),
    /// Terminal input could not be read.
    Io(std::io::Error),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Runtime(e) => write!(f, "runtime: {e}"),
            Self::ToolServer(msg) => write!(f, "tool server: {msg}"),
            Self::Io(e) => write!(f, "input: {e}"),
        }
    }
}

impl std::error::Error for ChatError {}

impl From<ConfigError> for ChatError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<RuntimeError> for ChatError {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}

impl From<std::io::Error> for ChatError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e = ConfigError::from(io_err);
        let s = e.to_string();
        assert!(s.starts_with("io:"), "got: {s}");
        assert!(s.contains("file not found"));
    }

    #[test]
    fn config_error_from_toml() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        let e = ConfigError::from(toml_err);
        assert!(e.to_string().starts_with("toml:"));
    }

    #[test]
    fn runtime_error_display_variants() {
        assert_eq!(
            RuntimeError::Status(503, "overloaded".into()).to_string(),
            "status 503: overloaded"
        );
        assert_eq!(
            RuntimeError::SettledUnavailable.to_string(),
            "run produced no settled result"
        );
    }

    #[test]
    fn chat_error_from_runtime_error() {
        let e = ChatError::from(RuntimeError::Stream("connection reset".into()));
        assert!(e.to_string().contains("connection reset"), "got: {e}");
        assert!(e.to_string().starts_with("runtime:"));
    }

    #[test]
    fn chat_error_from_config_error() {
        let e = ChatError::from(ConfigError::Invalid("empty model".into()));
        assert_eq!(e.to_string(), "config: invalid config: empty model");
    }
}
