//! Configuration loading for the `cupkeeper` binary.
//!
//! TOML file, environment variable overrides (the bot token is usually an
//! `$ENV_VAR` indirection), then a validation pass that fails before any
//! connection is attempted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use miette::{Diagnostic, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cupkeeper_core::MatchFormat;
use cupkeeper_discord::{BotConfig, GuildSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord connection settings
    pub discord: DiscordSection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Guild name -> tournament settings
    pub guilds: HashMap<String, GuildSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordSection {
    /// Bot token, or `$VAR` to read it from the environment
    #[serde(default = "default_token_env")]
    pub token: String,

    /// Prefix for text commands
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Configuration error types
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file")]
    #[diagnostic(
        code(cupkeeper::config::read_failed),
        help("Create a configuration file at {} or pass --config", .path.display())
    )]
    ReadFailed {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("failed to parse configuration")]
    #[diagnostic(code(cupkeeper::config::parse_failed))]
    ParseFailed {
        path: PathBuf,
        #[source]
        cause: toml::de::Error,
    },

    #[error("configuration validation failed")]
    #[diagnostic(
        code(cupkeeper::config::validation_failed),
        help("{}", errors.iter().map(|e| format!("{}: {}", e.field, e.message)).collect::<Vec<_>>().join("; "))
    )]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("environment variable not found")]
    #[diagnostic(
        code(cupkeeper::config::env_var_not_found),
        help("Set the environment variable: export {var_name}=<value>")
    )]
    EnvVarNotFound { var_name: String, used_for: String },
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl Config {
    /// Load configuration from file with environment variable overrides.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ConfigError::ReadFailed {
                    path: path.to_path_buf(),
                    cause: e,
                })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                cause: e,
            })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Resolve `$VAR` indirections from the environment.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if self.discord.token.starts_with('$') || self.discord.token.is_empty() {
            let var_name = self.discord.token.trim_start_matches('$');
            let var_name = if var_name.is_empty() {
                "DISCORD_TOKEN"
            } else {
                var_name
            };

            self.discord.token =
                std::env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound {
                    var_name: var_name.to_string(),
                    used_for: "Discord bot authentication".to_string(),
                })?;
        }
        Ok(())
    }

    /// Validate configuration before connecting anywhere.
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.discord.token.is_empty() {
            errors.push(ValidationError {
                field: "discord.token".to_string(),
                message: "Discord token must be provided".to_string(),
            });
        }

        if self.discord.prefix.is_empty() {
            errors.push(ValidationError {
                field: "discord.prefix".to_string(),
                message: "Command prefix cannot be empty".to_string(),
            });
        }

        if self.guilds.is_empty() {
            errors.push(ValidationError {
                field: "guilds".to_string(),
                message: "At least one guild must be configured".to_string(),
            });
        }

        for (guild, settings) in &self.guilds {
            // The smallest pool any format accepts; per-format minimums are
            // enforced again at match creation.
            if settings.maps.len() < MatchFormat::Bo1.min_pool_size() {
                errors.push(ValidationError {
                    field: format!("guilds.{}.maps", guild),
                    message: format!(
                        "map pool needs at least {} maps",
                        MatchFormat::Bo1.min_pool_size()
                    ),
                });
            }
            let mut seen = std::collections::HashSet::new();
            for map in &settings.maps {
                if !seen.insert(map) {
                    errors.push(ValidationError {
                        field: format!("guilds.{}.maps", guild),
                        message: format!("duplicate map `{}`", map),
                    });
                }
            }
        }

        if !errors.is_empty() {
            return Err(ConfigError::ValidationFailed { errors })?;
        }

        Ok(())
    }

    /// The runtime view handed to the Discord layer.
    pub fn into_bot_config(self) -> BotConfig {
        BotConfig {
            token: self.discord.token,
            prefix: self.discord.prefix,
            guilds: self.guilds,
        }
    }
}

// Default value functions
fn default_token_env() -> String {
    "$DISCORD_TOKEN".to_string()
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [discord]
        token = "literal-token"
        prefix = "!"

        [logging]
        level = "debug"

        [guilds."My Tournament Server"]
        maps = ["Yard", "D-17", "Pyramid", "Destination", "District"]
        captains_csv = "captains.csv"
        referee_role = "Referee"

        [guilds."My Tournament Server".broadcast]
        announcement = ["announcements"]
    "#;

    #[test]
    fn sample_config_parses() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.discord.token, "literal-token");
        assert_eq!(config.logging.level, "debug");
        let settings = &config.guilds["My Tournament Server"];
        assert_eq!(settings.maps.len(), 5);
        assert_eq!(settings.broadcast["announcement"], vec!["announcements"]);
        config.validate().unwrap();
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let serialized = toml::to_string(&config).unwrap();
        let _deserialized: Config = toml::from_str(&serialized).unwrap();
    }

    #[test]
    fn env_indirection_resolves() {
        // Rust tests share the process env; use a name nothing else reads.
        unsafe { std::env::set_var("CUPKEEPER_TEST_TOKEN", "from-env") };
        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config.discord.token = "$CUPKEEPER_TEST_TOKEN".to_string();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.discord.token, "from-env");
    }

    #[test]
    fn missing_env_var_is_an_error() {
        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config.discord.token = "$CUPKEEPER_DEFINITELY_UNSET".to_string();
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn tiny_map_pool_fails_validation() {
        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config
            .guilds
            .get_mut("My Tournament Server")
            .unwrap()
            .maps = vec!["OnlyOne".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn duplicate_maps_fail_validation() {
        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config
            .guilds
            .get_mut("My Tournament Server")
            .unwrap()
            .maps = vec!["Yard".to_string(), "Yard".to_string()];
        assert!(config.validate().is_err());
    }
}
