//! JSON run configuration.
//!
//! ```json
//! {
//!   "env_type": "grid",
//!   "env_args": {"width": 8, "height": 6},
//!   "agent_type": "ollama",
//!   "agent_args": {"model_name": "llama3.2-vision:11b"},
//!   "executor": {"press_step": 8, "action_frequency": 10}
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pallet_agent::{
    AnyAgent, DEFAULT_OLLAMA_HOST, OllamaAgent, RemoteAgent, ScriptedAgent, StdinAgent,
};
use pallet_game::ExecutorConfig;
use pallet_game::env::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const SECRET_ENV: &str = "AGENT_SERVER_SECRET_KEY";
pub const HOST_ENV: &str = "SERVER_HOST";
pub const PORT_ENV: &str = "SERVER_PORT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvKind {
    Pokemon,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Remote,
    Ollama,
    Scripted,
    Stdin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub env_type: EnvKind,
    #[serde(default)]
    pub env_args: Value,
    pub agent_type: AgentKind,
    #[serde(default)]
    pub agent_args: Value,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub max_steps: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PokemonArgs {
    pub headless: bool,
    pub memory_dump: PathBuf,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GridArgs {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default)]
    pub debug: bool,
}

fn default_width() -> usize {
    DEFAULT_WIDTH
}

fn default_height() -> usize {
    DEFAULT_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteArgs {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OllamaArgs {
    pub model_name: String,
    #[serde(default = "default_ollama_host")]
    pub host: String,
    #[serde(default)]
    pub debug: bool,
}

fn default_ollama_host() -> String {
    DEFAULT_OLLAMA_HOST.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptedArgs {
    pub replies: Vec<Option<String>>,
    #[serde(default)]
    pub cycle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvSettings {
    Pokemon(PokemonArgs),
    Grid(GridArgs),
}

impl EnvSettings {
    pub fn debug(&self) -> bool {
        match self {
            Self::Pokemon(args) => args.debug,
            Self::Grid(args) => args.debug,
        }
    }
}

/// Remote endpoint after environment fallbacks are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentSettings {
    Remote(RemoteSettings),
    Ollama(OllamaArgs),
    Scripted(ScriptedArgs),
    Stdin,
}

impl AgentSettings {
    pub fn debug(&self) -> bool {
        match self {
            Self::Remote(settings) => settings.debug,
            Self::Ollama(args) => args.debug,
            Self::Scripted(_) | Self::Stdin => false,
        }
    }

    pub fn build(self) -> AnyAgent {
        match self {
            Self::Remote(settings) => {
                let mut agent = RemoteAgent::new(settings.api_url);
                if let Some(key) = settings.api_key {
                    agent = agent.with_api_key(key);
                }
                if let Some(secret) = settings.secret_key {
                    agent = agent.with_secret_key(secret);
                }
                AnyAgent::Remote(agent)
            }
            Self::Ollama(args) => AnyAgent::Ollama(
                OllamaAgent::new(args.model_name)
                    .with_host(args.host)
                    .streaming(args.debug),
            ),
            Self::Scripted(args) => {
                let agent = ScriptedAgent::new(args.replies);
                AnyAgent::Scripted(if args.cycle { agent.cycling() } else { agent })
            }
            Self::Stdin => AnyAgent::Stdin(StdinAgent::new()),
        }
    }
}

impl RemoteArgs {
    /// Fill the URL from `SERVER_HOST`/`SERVER_PORT` and the secret from
    /// `AGENT_SERVER_SECRET_KEY` when the config leaves them out.
    pub fn resolve(self, env: impl Fn(&str) -> Option<String>) -> Result<RemoteSettings> {
        let api_url = match self.api_url {
            Some(url) => url,
            None => {
                let host = env(HOST_ENV).with_context(|| {
                    format!("agent_args.api_url is not set and {HOST_ENV} is missing")
                })?;
                let port = env(PORT_ENV).with_context(|| {
                    format!("agent_args.api_url is not set and {PORT_ENV} is missing")
                })?;
                format!("http://{host}:{port}/predict")
            }
        };

        Ok(RemoteSettings {
            api_url,
            api_key: self.api_key,
            secret_key: self.secret_key.or_else(|| env(SECRET_ENV)),
            debug: self.debug,
        })
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn environment(&self) -> Result<EnvSettings> {
        Ok(match self.env_type {
            EnvKind::Pokemon => EnvSettings::Pokemon(args(&self.env_args, "env_args")?),
            EnvKind::Grid => EnvSettings::Grid(args(&self.env_args, "env_args")?),
        })
    }

    pub fn agent(&self) -> Result<AgentSettings> {
        self.agent_with_env(|key| std::env::var(key).ok())
    }

    pub fn agent_with_env(&self, env: impl Fn(&str) -> Option<String>) -> Result<AgentSettings> {
        Ok(match self.agent_type {
            AgentKind::Remote => {
                let remote: RemoteArgs = args(&self.agent_args, "agent_args")?;
                AgentSettings::Remote(remote.resolve(env)?)
            }
            AgentKind::Ollama => AgentSettings::Ollama(args(&self.agent_args, "agent_args")?),
            AgentKind::Scripted => AgentSettings::Scripted(args(&self.agent_args, "agent_args")?),
            AgentKind::Stdin => AgentSettings::Stdin,
        })
    }
}

fn args<T: DeserializeOwned>(value: &Value, field: &str) -> Result<T> {
    let value = match value {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(value).with_context(|| format!("invalid {field}"))
}
