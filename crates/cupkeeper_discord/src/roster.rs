//! Captain roster import/export.
//!
//! The roster is a CSV of `discord_id,team,nickname,group` rows. Blank lines
//! and lines starting with `#` are skipped. Nothing is persisted back; the
//! in-memory roster is rebuilt by `!refresh` and edited by referee commands.

use std::collections::HashMap;
use std::path::Path;

use serenity::all::RoleId;

use crate::error::{DiscordError, Result};

/// One registered team captain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCaptain {
    /// Discord tag (`name` or `name#1234`) as it appears in the roster.
    pub discord_id: String,
    pub team_name: String,
    pub nickname: String,
    pub group: String,
    /// Team role, filled in once the role exists on the guild.
    pub team_role: Option<RoleId>,
}

impl TeamCaptain {
    pub fn new(
        discord_id: impl Into<String>,
        team_name: impl Into<String>,
        nickname: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            discord_id: discord_id.into(),
            team_name: team_name.into(),
            nickname: nickname.into(),
            group: group.into(),
            team_role: None,
        }
    }
}

/// Parse a roster file into `discord_id -> captain`.
pub fn parse_roster(path: &Path) -> Result<HashMap<String, TeamCaptain>> {
    let content = std::fs::read_to_string(path).map_err(|e| DiscordError::RosterRead {
        path: path.to_path_buf(),
        cause: e,
    })?;
    parse_roster_str(&content).map_err(|err| match err {
        DiscordError::RosterParse { cause, .. } => DiscordError::RosterParse {
            path: path.to_path_buf(),
            cause,
        },
        other => other,
    })
}

/// Parse roster CSV content. Split out for tests.
pub fn parse_roster_str(content: &str) -> Result<HashMap<String, TeamCaptain>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut captains = HashMap::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| DiscordError::RosterParse {
            path: std::path::PathBuf::new(),
            cause: e,
        })?;
        if record.is_empty() || record.iter().all(|f| f.is_empty()) {
            continue;
        }
        if record.len() < 4 {
            return Err(DiscordError::RosterRow { row: row + 1 });
        }
        let captain = TeamCaptain::new(&record[0], &record[1], &record[2], &record[3]);
        captains.insert(captain.discord_id.clone(), captain);
    }
    Ok(captains)
}

/// Render a member list as CSV bytes for the `!members` export.
pub fn members_csv(member_tags: &[String]) -> Vec<u8> {
    let mut out = Vec::from(&b"#discord_id\n"[..]);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(&mut out);
    for tag in member_tags {
        // A single-field record per member.
        let _ = writer.write_record([tag.as_str()]);
    }
    let _ = writer.flush();
    drop(writer);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_rows_and_skips_comments() {
        let roster = parse_roster_str(
            "#discord_id,team,nick,group\n\
             levak#1234,Vibe,LeVak,A\n\
             \n\
             croissant#5678,Baguette,Croissant,B\n",
        )
        .unwrap();
        assert_eq!(roster.len(), 2);
        let captain = &roster["levak#1234"];
        assert_eq!(captain.team_name, "Vibe");
        assert_eq!(captain.nickname, "LeVak");
        assert_eq!(captain.group, "A");
        assert_eq!(captain.team_role, None);
    }

    #[test]
    fn quoted_fields_are_supported() {
        let roster =
            parse_roster_str("player#1,\"Team, With Comma\",Nick,A\n").unwrap();
        assert_eq!(roster["player#1"].team_name, "Team, With Comma");
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = parse_roster_str("player#1,TeamOnly\n").unwrap_err();
        assert!(matches!(err, DiscordError::RosterRow { row: 1 }));
    }

    #[test]
    fn later_rows_override_earlier_ones() {
        let roster = parse_roster_str(
            "p#1,First,Nick,A\n\
             p#1,Second,Nick,B\n",
        )
        .unwrap();
        assert_eq!(roster["p#1"].team_name, "Second");
    }

    #[test]
    fn members_export_round_trips() {
        let bytes = members_csv(&["a#1".to_string(), "b#2".to_string()]);
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "#discord_id\na#1\nb#2\n");
    }
}
