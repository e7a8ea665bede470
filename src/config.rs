//! Configuration loading: TOML file plus environment overrides.
//!
//! All file fields are optional; missing values fall back to defaults so a
//! bare `webmate` invocation works against the default endpoint. Agent
//! instructions are loaded once at startup — never ambient global state —
//! from an optional `instructions_file`, with a built-in template as the
//! fallback.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "webmate.toml";
const DEFAULT_INSTRUCTIONS: &str = include_str!("templates/instructions.md");

/// Effective runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remembered user/assistant pairs, always >= 1.
    pub memory_turns: usize,
    pub api: ApiConfig,
    pub tool_server: ToolServerConfig,
    pub display: DisplayConfig,
    /// Optional path to an agent-instructions override file.
    pub instructions_file: Option<String>,
}

/// Agent-runtime endpoint settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// How the MCP tool-server subprocess is launched and addressed.
#[derive(Debug, Clone)]
pub struct ToolServerConfig {
    /// Label the runtime uses to reference this server.
    pub name: String,
    /// Launcher binary, resolved on PATH at startup.
    pub command: String,
    pub args: Vec<String>,
}

/// Terminal display settings.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_turns: 5,
            api: ApiConfig {
                base_url: "https://api.openai.com/v1".into(),
                api_key: String::new(),
                model: "gpt-4.1".into(),
            },
            tool_server: ToolServerConfig {
                name: "playwright".into(),
                command: "npx".into(),
                args: vec!["@playwright/mcp@latest".into()],
            },
            display: DisplayConfig { color: true },
            instructions_file: None,
        }
    }
}

/// On-disk TOML shape; everything optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    memory_turns: Option<usize>,
    #[serde(default)]
    api: FileApiConfig,
    #[serde(default)]
    tool_server: FileToolServerConfig,
    #[serde(default)]
    display: FileDisplayConfig,
    instructions_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileApiConfig {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileToolServerConfig {
    name: Option<String>,
    command: Option<String>,
    args: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct FileDisplayConfig {
    color: Option<bool>,
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config). Without
/// one, `./webmate.toml` is used when present; a missing default file is
/// fine, a missing override is an error.
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(path_override, |path| std::fs::read_to_string(path), |name| {
        std::env::var(name).ok()
    })
}

fn load_config_from_sources<FRead, FEnv>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
{
    let file = match path_override {
        Some(path) => {
            let text = read_file(Path::new(path))?;
            toml::from_str::<FileConfig>(&text)?
        }
        None => match read_file(Path::new(DEFAULT_CONFIG_FILE)) {
            Ok(text) => toml::from_str::<FileConfig>(&text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(err) => return Err(err.into()),
        },
    };

    let mut config = resolve(file)?;

    if let Some(url) = env_lookup("WEBMATE_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(key) = env_lookup("WEBMATE_API_KEY") {
        config.api.api_key = key;
    }
    if let Some(model) = env_lookup("WEBMATE_MODEL") {
        config.api.model = model;
    }

    Ok(config)
}

fn resolve(file: FileConfig) -> Result<Config, ConfigError> {
    let defaults = Config::default();

    if let Some(turns) = file.memory_turns {
        if turns == 0 {
            return Err(ConfigError::Invalid(
                "memory_turns must be at least 1".into(),
            ));
        }
    }

    Ok(Config {
        memory_turns: file.memory_turns.unwrap_or(defaults.memory_turns),
        api: ApiConfig {
            base_url: file.api.base_url.unwrap_or(defaults.api.base_url),
            api_key: file.api.api_key.unwrap_or(defaults.api.api_key),
            model: file.api.model.unwrap_or(defaults.api.model),
        },
        tool_server: ToolServerConfig {
            name: file.tool_server.name.unwrap_or(defaults.tool_server.name),
            command: file
                .tool_server
                .command
                .unwrap_or(defaults.tool_server.command),
            args: file.tool_server.args.unwrap_or(defaults.tool_server.args),
        },
        display: DisplayConfig {
            color: file.display.color.unwrap_or(defaults.display.color),
        },
        instructions_file: file.instructions_file,
    })
}

/// Load the agent instruction text once, at startup.
///
/// A configured `instructions_file` must be readable; without one, the
/// built-in template applies.
pub fn load_instructions(config: &Config) -> Result<String, ConfigError> {
    match config.instructions_file.as_deref() {
        Some(path) => std::fs::read_to_string(path).map_err(|err| {
            ConfigError::Invalid(format!("failed to read instructions file `{path}`: {err}"))
        }),
        None => Ok(DEFAULT_INSTRUCTIONS.to_string()),
    }
}
