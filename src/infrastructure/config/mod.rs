//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::application::messaging::{DispatcherOptions, DEFAULT_PREFIX};

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub plugins: PluginConfig,
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    pub token: Option<String>,
    /// Reply sent when a prefixed call resolves to nothing; `{call}` is substituted
    pub unknown_command_reply: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PluginConfig {
    /// Abort a plugin load when its commands have no command bucket to go to
    pub strict_commands: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PersistenceConfig {
    pub path: Option<PathBuf>,
    pub restore_on_start: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "plugbot".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            token: None,
            unknown_command_reply: None,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("data/buckets.json")),
            restore_on_start: true,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Overlay `BOT_TOKEN` and `BOT_PREFIX` from the environment
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.bot.token = Some(token);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::InvalidValue("bot.prefix must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn dispatcher_options(&self) -> DispatcherOptions {
        DispatcherOptions {
            prefix: self.bot.prefix.clone(),
            unknown_command_reply: self.bot.unknown_command_reply.clone(),
            strict_commands: self.plugins.strict_commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bot.prefix, "!");
        assert!(config.bot.token.is_none());
        assert!(!config.plugins.strict_commands);
        assert!(config.persistence.restore_on_start);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml(
            "bot:\n  prefix: \"?\"\n  unknown-command-reply: \"nope: {call}\"\nplugins:\n  strict-commands: true\n",
        )
        .unwrap();

        assert_eq!(config.bot.prefix, "?");
        assert_eq!(config.bot.name, "plugbot");
        assert!(config.plugins.strict_commands);

        let options = config.dispatcher_options();
        assert_eq!(options.prefix, "?");
        assert_eq!(options.unknown_command_reply.as_deref(), Some("nope: {call}"));
        assert!(options.strict_commands);
    }

    #[test]
    fn test_empty_prefix_is_invalid() {
        let err = Config::from_yaml("bot:\n  prefix: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("restore-on-start"));
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.bot.prefix, "!");
    }
}
