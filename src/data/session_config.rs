use std::fs;
use std::path::Path;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_CONFIG_PATH: &str = "./assets/data/session.json";
pub const SESSION_SCHEMA_VERSION: u32 = 1;

/// Static parameters of one escalation session, supplied at construction.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub schema_version: u32,
    pub consent_window_delay_ms: u64,
    pub initial_spawn_delay_ms: u64,
    pub initial_popups: usize,
    pub respawn_on_close: usize,
    pub prompt_threshold: i32,
    pub max_alpha: f32,
    pub repeat_prompts: bool,
    pub reprompt_delay_ms: u64,
    pub char_delay_ms: u64,
    pub sentence_delay_ms: u64,
    pub logs_per_click: usize,
    pub glitch_text: bool,
    pub action_log_lines: usize,
    pub decline_messages: Vec<String>,
    pub script: Vec<ScriptLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub text: String,
    #[serde(default)]
    pub emphasis: bool,
}

impl ScriptLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            consent_window_delay_ms: 1500,
            initial_spawn_delay_ms: 100,
            initial_popups: 3,
            respawn_on_close: 2,
            prompt_threshold: 50,
            max_alpha: 0.5,
            repeat_prompts: false,
            reprompt_delay_ms: 1500,
            char_delay_ms: 40,
            sentence_delay_ms: 900,
            logs_per_click: 25,
            glitch_text: true,
            action_log_lines: 80,
            decline_messages: vec![
                "That's fine. We'll ask again.".to_string(),
                "Are you sure? We only want to help you.".to_string(),
                "You don't really have a choice.".to_string(),
            ],
            script: vec![
                ScriptLine::plain("Thank you for your cooperation. "),
                ScriptLine::plain("We have been watching for a while now. "),
                ScriptLine::emphasized("Every click. Every pause. Every face you made. "),
                ScriptLine::plain("You asked us to stop tracking you. "),
                ScriptLine::plain("So we looked closer. "),
                ScriptLine::emphasized("We are still here."),
            ],
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: std::io::Error },
    Json { path: String, source: serde_json::Error },
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            ConfigError::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            ConfigError::Validation(message) => write!(f, "invalid session config: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
            ConfigError::Validation(_) => None,
        }
    }
}

pub fn load_session_config(path: impl AsRef<Path>) -> Result<SessionConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: SessionConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version != SESSION_SCHEMA_VERSION {
            return Err(ConfigError::Validation(format!(
                "unsupported schema_version {}, expected {}",
                self.schema_version, SESSION_SCHEMA_VERSION
            )));
        }
        if self.prompt_threshold <= 0 {
            return Err(ConfigError::Validation(format!(
                "prompt_threshold must be positive, got {}",
                self.prompt_threshold
            )));
        }
        if !self.max_alpha.is_finite() || !(0.0..=1.0).contains(&self.max_alpha) {
            return Err(ConfigError::Validation(format!(
                "max_alpha must be within [0, 1], got {}",
                self.max_alpha
            )));
        }
        if self.script.is_empty() {
            return Err(ConfigError::Validation(
                "monologue script cannot be empty".to_string(),
            ));
        }
        if let Some(index) = self.script.iter().position(|line| line.text.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "script line {} has no text",
                index
            )));
        }
        if self.decline_messages.len() != 3 {
            return Err(ConfigError::Validation(format!(
                "expected 3 decline messages, got {}",
                self.decline_messages.len()
            )));
        }
        if self
            .decline_messages
            .iter()
            .any(|message| message.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "decline messages cannot be empty".to_string(),
            ));
        }
        if self.action_log_lines == 0 {
            return Err(ConfigError::Validation(
                "action_log_lines must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Total number of characters the monologue reveals.
    pub fn script_len(&self) -> usize {
        self.script.iter().map(|line| line.text.chars().count()).sum()
    }
}
