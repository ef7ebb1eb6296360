use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DiscordError {
    #[error("guild not configured")]
    #[diagnostic(
        code(cupkeeper::discord::guild_not_configured),
        help("Add a [guilds.\"{guild}\"] section to the configuration file")
    )]
    GuildNotConfigured { guild: String },

    #[error("unknown team role")]
    #[diagnostic(
        code(cupkeeper::discord::unknown_team_role),
        help("Role `{role}` is not a registered team; captains create team roles when they join")
    )]
    UnknownTeamRole { role: String },

    #[error("failed to read roster file")]
    #[diagnostic(code(cupkeeper::discord::roster_read_failed))]
    RosterRead {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("failed to parse roster file")]
    #[diagnostic(
        code(cupkeeper::discord::roster_parse_failed),
        help("Expected CSV rows of `discord_id,team,nickname,group`")
    )]
    RosterParse {
        path: PathBuf,
        #[source]
        cause: csv::Error,
    },

    #[error("malformed roster row")]
    #[diagnostic(
        code(cupkeeper::discord::roster_row),
        help("Row {row}: expected `discord_id,team,nickname,group`")
    )]
    RosterRow { row: usize },

    #[error("failed to create role")]
    #[diagnostic(code(cupkeeper::discord::role_create_failed))]
    RoleCreateFailed {
        name: String,
        #[source]
        cause: serenity::Error,
    },

    #[error("failed to create channel")]
    #[diagnostic(
        code(cupkeeper::discord::channel_create_failed),
        help("Check that the bot has the Manage Channels permission")
    )]
    ChannelCreateFailed {
        name: String,
        #[source]
        cause: serenity::Error,
    },

    #[error("Discord API call failed")]
    #[diagnostic(code(cupkeeper::discord::api_failed))]
    ApiFailed {
        operation: String,
        #[source]
        cause: serenity::Error,
    },

    #[error("draft refused the action")]
    #[diagnostic(code(cupkeeper::discord::draft_refused))]
    Draft {
        #[source]
        cause: cupkeeper_core::CoreError,
    },
}

impl From<cupkeeper_core::CoreError> for DiscordError {
    fn from(cause: cupkeeper_core::CoreError) -> Self {
        Self::Draft { cause }
    }
}

impl DiscordError {
    pub fn api(operation: impl Into<String>, cause: serenity::Error) -> Self {
        Self::ApiFailed {
            operation: operation.into(),
            cause,
        }
    }
}

pub type Result<T> = std::result::Result<T, DiscordError>;
