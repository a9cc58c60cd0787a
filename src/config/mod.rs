//! Configuration module for Cube Analyst.
//!
//! Handles the config file, environment variables, and settings.

mod settings;

pub use settings::{
    expand_env_vars, AgentSettings, LoggingSettings, SemanticLayerSettings, Settings,
    SettingsError, CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_SEMANTIC_LAYER_PATH,
};
