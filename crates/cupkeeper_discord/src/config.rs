//! Runtime configuration consumed by the bot.
//!
//! These types are deserialized from the binary's TOML config file; loading,
//! env overrides and validation live in the `cupkeeper` binary crate.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-guild tournament settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildSettings {
    /// Candidate map pool handed to every draft in this guild.
    pub maps: Vec<String>,

    /// Optional captain roster, re-read by `!refresh`.
    #[serde(default)]
    pub captains_csv: Option<PathBuf>,

    /// Team role name template; `{}` is replaced by the team name.
    #[serde(default = "default_team_role_format")]
    pub team_role_format: String,

    /// Group role name template; `{}` is replaced by the group id.
    #[serde(default = "default_group_role_format")]
    pub group_role_format: String,

    #[serde(default = "default_captain_role")]
    pub captain_role: String,

    #[serde(default = "default_referee_role")]
    pub referee_role: String,

    #[serde(default = "default_streamer_role")]
    pub streamer_role: String,

    /// Broadcast rooms: id (e.g. `announcement`) -> channel names.
    #[serde(default)]
    pub broadcast: HashMap<String, Vec<String>>,
}

impl GuildSettings {
    pub fn team_role_name(&self, team: &str) -> String {
        self.team_role_format.replace("{}", team)
    }

    pub fn group_role_name(&self, group: &str) -> String {
        self.group_role_format.replace("{}", group)
    }
}

/// Everything the bot needs at runtime.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Resolved bot token (env indirection already applied).
    pub token: String,
    /// Prefix for text commands.
    pub prefix: String,
    /// Guild name -> settings; unconfigured guilds are ignored.
    pub guilds: HashMap<String, GuildSettings>,
}

fn default_team_role_format() -> String {
    "Team {}".to_string()
}

fn default_group_role_format() -> String {
    "Group {}".to_string()
}

fn default_captain_role() -> String {
    "Team Captain".to_string()
}

fn default_referee_role() -> String {
    "Referee".to_string()
}

fn default_streamer_role() -> String {
    "Streamer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn role_templates_substitute() {
        let settings: GuildSettings = toml::from_str(
            r#"
            maps = ["Yard", "D-17"]
            team_role_format = "Cup Team {}"
            "#,
        )
        .unwrap();
        assert_eq!(settings.team_role_name("Rocket"), "Cup Team Rocket");
        assert_eq!(settings.group_role_name("A"), "Group A");
        assert_eq!(settings.captain_role, "Team Captain");
    }
}
