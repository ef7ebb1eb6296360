//! Prefix-command splitting and mention parsing.
//!
//! Dispatch itself (permission tiers, API calls) happens in the event
//! handler; this module is the pure, testable part.

use serenity::all::{ChannelId, RoleId, UserId};

/// Split `!command args...` into `("command", "args...")`.
///
/// Returns `None` for anything that does not start with the prefix.
pub fn split_command<'a>(prefix: &str, content: &'a str) -> Option<(&'a str, &'a str)> {
    let rest = content.strip_prefix(prefix)?;
    if rest.is_empty() {
        return None;
    }
    match rest.split_once(char::is_whitespace) {
        Some((command, args)) => Some((command, args.trim())),
        None => Some((rest, "")),
    }
}

/// First whitespace-separated token of `args`, if any.
pub fn first_token(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

/// Parse a `<@123>` / `<@!123>` user mention.
pub fn parse_user_mention(token: &str) -> Option<UserId> {
    let inner = token.strip_prefix("<@")?.strip_suffix('>')?;
    let inner = inner.strip_prefix('!').unwrap_or(inner);
    inner.parse::<u64>().ok().map(UserId::new)
}

/// Parse a `<@&123>` role mention.
pub fn parse_role_mention(token: &str) -> Option<RoleId> {
    let inner = token.strip_prefix("<@&")?.strip_suffix('>')?;
    inner.parse::<u64>().ok().map(RoleId::new)
}

/// Parse a `<#123>` channel mention.
pub fn parse_channel_mention(token: &str) -> Option<ChannelId> {
    let inner = token.strip_prefix("<#")?.strip_suffix('>')?;
    inner.parse::<u64>().ok().map(ChannelId::new)
}

/// Usage snippet for a command with strict arity, shown on malformed input.
pub fn usage(command: &str) -> Option<&'static str> {
    Some(match command {
        "add_captain" => "!add_captain @member team nick group",
        "remove_captain" => "!remove_captain @member",
        "bo1" => "!bo1 @teamA @teamB",
        "bo2" => "!bo2 @teamA @teamB",
        "bo3" => "!bo3 @teamA @teamB",
        "wipe_messages" => "!wipe_messages #channel",
        "say" => "!say #channel message...",
        "ban" => "!ban map",
        "pick" => "!pick map",
        "side" => "!side attack|defend",
        "stream" => "!stream match_id",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_command_and_args() {
        assert_eq!(split_command("!", "!ban Pyramid"), Some(("ban", "Pyramid")));
        assert_eq!(split_command("!", "!refresh"), Some(("refresh", "")));
        assert_eq!(
            split_command("!", "!say #general hello  there"),
            Some(("say", "#general hello  there"))
        );
    }

    #[test]
    fn ignores_non_commands() {
        assert_eq!(split_command("!", "hello there"), None);
        assert_eq!(split_command("!", "!"), None);
        assert_eq!(split_command("?", "!ban Yard"), None);
    }

    #[test]
    fn custom_prefix_is_honored() {
        assert_eq!(split_command("$", "$pick D-17"), Some(("pick", "D-17")));
    }

    #[test]
    fn parses_mentions() {
        assert_eq!(parse_user_mention("<@123>"), Some(UserId::new(123)));
        assert_eq!(parse_user_mention("<@!123>"), Some(UserId::new(123)));
        assert_eq!(parse_role_mention("<@&456>"), Some(RoleId::new(456)));
        assert_eq!(parse_channel_mention("<#789>"), Some(ChannelId::new(789)));
        assert_eq!(parse_user_mention("<@&456>"), None);
        assert_eq!(parse_role_mention("plain"), None);
    }

    #[test]
    fn usage_covers_strict_arity_commands() {
        assert!(usage("bo1").unwrap().contains("@teamA"));
        assert!(usage("refresh").is_none());
    }
}
