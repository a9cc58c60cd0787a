//! TOML-based configuration for Cube Analyst.
//!
//! Supports a config file (cube-analyst.toml) with environment variable
//! expansion in paths.
//!
//! Example configuration:
//! ```toml
//! [semantic_layer]
//! file_path = "${DATA_DIR}/semantic_layer.txt"
//!
//! [agent]
//! model = "gpt-4o-mini"
//! temperature = 0.1
//! max_tokens = 2000
//! silent = true
//! api_key_env = "AZURE_OPENAI_KEY"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for in the working directory.
pub const CONFIG_FILE_NAME: &str = "cube-analyst.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "CUBE_ANALYST_CONFIG";

/// Semantic layer path used when neither the CLI nor the config names one.
pub const DEFAULT_SEMANTIC_LAYER_PATH: &str = "assets/semantic_layer.txt";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Semantic layer source.
    pub semantic_layer: SemanticLayerSettings,

    /// Options handed to the conversational agent.
    pub agent: AgentSettings,

    /// Log output.
    pub logging: LoggingSettings,
}

/// Semantic layer source configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SemanticLayerSettings {
    /// Path to the JSON Lines file (supports ${ENV_VAR} expansion).
    pub file_path: Option<String>,
}

/// Agent configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Model or deployment name.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f64,

    /// Maximum tokens per completion.
    pub max_tokens: u32,

    /// Suppress the agent's intermediate messages.
    pub silent: bool,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            silent: true,
            api_key_env: "AZURE_OPENAI_KEY".to_string(),
        }
    }
}

impl AgentSettings {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, SettingsError> {
        env::var(&self.api_key_env).map_err(|_| SettingsError::MissingEnvVar(self.api_key_env.clone()))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset (e.g. "info",
    /// "cube_analyst=debug").
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `CUBE_ANALYST_CONFIG`
    /// 2. `./cube-analyst.toml`
    /// 3. `~/.config/cube-analyst/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("cube-analyst").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Resolve the semantic layer path.
    ///
    /// An explicit override wins, then the configured `file_path` (with
    /// environment variables expanded), then [`DEFAULT_SEMANTIC_LAYER_PATH`].
    pub fn semantic_layer_path(&self, override_path: Option<&Path>) -> Result<PathBuf, SettingsError> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }

        match &self.semantic_layer.file_path {
            Some(path) => Ok(PathBuf::from(expand_env_vars(path)?)),
            None => Ok(PathBuf::from(DEFAULT_SEMANTIC_LAYER_PATH)),
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut var_name = String::new();
        if braced {
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
