//! The keeper: captain roster, team roles, match channels and draft
//! sessions, per guild.
//!
//! Discord is the source of truth for identities (roles, members); the
//! keeper owns the mapping from those identities to tournament concepts and
//! the one `MatchDraft` per match channel. Serenity delivers events one at a
//! time per channel, which is the serialization the draft engine relies on.

use std::collections::HashMap;

use serenity::all::{
    ChannelId, ChannelType, CreateAttachment, CreateChannel, CreateMessage, EditMember,
    EditMessage, EditRole, GetMessages, GuildChannel, GuildId, Member, Mentionable, Message,
    PermissionOverwrite, PermissionOverwriteType, Permissions, RoleId, UserId,
};
use serenity::client::Context;
use tokio::sync::RwLock;
use tracing::{info, warn};

use cupkeeper_core::{Actor, MatchDraft, MatchFormat, Team, TeamId};

use crate::config::{BotConfig, GuildSettings};
use crate::error::{DiscordError, Result};
use crate::notifier::ChannelNotifier;
use crate::roster::{self, TeamCaptain};
use crate::sanitize;

/// Cached guild-wide roles looked up by configured name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialRoles {
    pub captain: Option<RoleId>,
    pub referee: Option<RoleId>,
    pub streamer: Option<RoleId>,
}

/// A registered team: its display name and its Discord role.
#[derive(Debug, Clone)]
pub struct TeamEntry {
    pub name: String,
    pub role: RoleId,
}

/// One match channel and the draft running inside it.
pub struct MatchSession {
    pub channel: ChannelId,
    pub draft: MatchDraft,
}

/// Per-guild runtime state.
pub struct GuildHost {
    pub settings: GuildSettings,
    /// Discord tag -> captain.
    pub captains: HashMap<String, TeamCaptain>,
    /// Team role name -> team.
    pub teams: HashMap<String, TeamEntry>,
    /// Group id -> cached group role.
    pub groups: HashMap<String, Option<RoleId>>,
    pub special: SpecialRoles,
    /// Match channel name -> session.
    pub matches: HashMap<String, MatchSession>,
}

/// The bot's shared state and all guild-facing operations.
pub struct Keeper {
    config: BotConfig,
    guilds: RwLock<HashMap<GuildId, GuildHost>>,
}

impl Keeper {
    pub fn new(config: BotConfig) -> Self {
        Self {
            config,
            guilds: RwLock::new(HashMap::new()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    /// Initialize state for a configured guild; logs and skips the rest.
    pub async fn init_guild(&self, ctx: &Context, guild_id: GuildId) -> Result<()> {
        let guild = ctx
            .http
            .get_guild(guild_id)
            .await
            .map_err(|e| DiscordError::api("get_guild", e))?;

        let Some(settings) = self.config.guilds.get(&guild.name).cloned() else {
            warn!(guild = %guild.name, "guild not configured, ignoring");
            return Err(DiscordError::GuildNotConfigured { guild: guild.name });
        };

        let special = SpecialRoles {
            captain: lookup_role(&guild, &settings.captain_role),
            referee: lookup_role(&guild, &settings.referee_role),
            streamer: lookup_role(&guild, &settings.streamer_role),
        };
        for (role_id, name) in [
            (special.captain, &settings.captain_role),
            (special.referee, &settings.referee_role),
            (special.streamer, &settings.streamer_role),
        ] {
            if role_id.is_none() {
                warn!(guild = %guild.name, role = %name, "missing special role");
            }
        }

        let mut host = GuildHost {
            settings,
            captains: HashMap::new(),
            teams: HashMap::new(),
            groups: HashMap::new(),
            special,
            matches: HashMap::new(),
        };

        if let Some(path) = host.settings.captains_csv.clone() {
            match roster::parse_roster(&path) {
                Ok(captains) => {
                    info!(guild = %guild.name, count = captains.len(), "parsed captain roster");
                    host.captains = captains;
                    self.cache_group_roles(&guild, &mut host);
                }
                Err(e) => warn!(guild = %guild.name, error = %e, "failed to load roster"),
            }
        }

        self.guilds.write().await.insert(guild_id, host);
        info!(guild = %guild.name, "guild ready");
        Ok(())
    }

    /// Lazily initialize a guild the first time a command arrives from it.
    pub async fn ensure_guild(&self, ctx: &Context, guild_id: GuildId) -> Result<()> {
        if self.guilds.read().await.contains_key(&guild_id) {
            return Ok(());
        }
        self.init_guild(ctx, guild_id).await
    }

    pub async fn special_roles(&self, guild_id: GuildId) -> SpecialRoles {
        self.guilds
            .read()
            .await
            .get(&guild_id)
            .map(|host| host.special)
            .unwrap_or_default()
    }

    fn cache_group_roles(&self, guild: &serenity::all::PartialGuild, host: &mut GuildHost) {
        let groups: Vec<String> = host
            .captains
            .values()
            .map(|c| c.group.clone())
            .collect();
        for group in groups {
            let name = host.settings.group_role_name(&group);
            let role = lookup_role(guild, &name);
            if role.is_none() {
                warn!(group = %group, role = %name, "missing group role");
            }
            host.groups.insert(group, role);
        }
    }

    /// Mention-prefixed reply in the channel the command came from.
    pub async fn reply(&self, ctx: &Context, msg: &Message, text: &str) {
        let content = format!("{} {}", msg.author.mention(), text);
        if let Err(e) = msg.channel_id.say(&ctx.http, content).await {
            warn!(channel = %msg.channel_id, error = %e, "failed to reply");
        }
    }

    // ---- roster and roles ----------------------------------------------

    /// Create the mentionable, permission-less team role, reusing an
    /// existing role of the same name.
    async fn create_team_role(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        host: &mut GuildHost,
        team_name: &str,
    ) -> Result<RoleId> {
        let role_name = host.settings.team_role_name(team_name);
        if let Some(entry) = host.teams.get(&role_name) {
            return Ok(entry.role);
        }

        let guild = ctx
            .http
            .get_guild(guild_id)
            .await
            .map_err(|e| DiscordError::api("get_guild", e))?;

        let role_id = match lookup_role(&guild, &role_name) {
            Some(role_id) => role_id,
            None => {
                let role = guild_id
                    .create_role(
                        &ctx.http,
                        EditRole::new()
                            .name(&role_name)
                            .permissions(Permissions::empty())
                            .mentionable(true),
                    )
                    .await
                    .map_err(|e| DiscordError::RoleCreateFailed {
                        name: role_name.clone(),
                        cause: e,
                    })?;
                info!(role = %role_name, "created team role");
                role.id
            }
        };

        host.teams.insert(
            role_name,
            TeamEntry {
                name: team_name.to_string(),
                role: role_id,
            },
        );
        Ok(role_id)
    }

    /// New member joined: if they are a registered captain, set up their
    /// team role, assign captain/group roles and apply their nickname.
    pub async fn handle_member_join(&self, ctx: &Context, member: &Member) -> Result<()> {
        let guild_id = member.guild_id;
        self.ensure_guild(ctx, guild_id).await?;
        let mut guilds = self.guilds.write().await;
        let Some(host) = guilds.get_mut(&guild_id) else {
            return Ok(());
        };

        let tag = member.user.tag();
        let Some(captain) = host.captains.get(&tag).cloned() else {
            info!(member = %tag, "joining member is not a registered captain");
            return Ok(());
        };
        info!(member = %tag, team = %captain.team_name, "team captain joined");

        let team_role = self
            .create_team_role(ctx, guild_id, host, &captain.team_name)
            .await?;
        if let Some(entry) = host.captains.get_mut(&tag) {
            entry.team_role = Some(team_role);
        }

        let group_role = host.groups.get(&captain.group).copied().flatten();
        let captain_role = host.special.captain;

        let mut roles = vec![team_role];
        roles.extend(captain_role);
        roles.extend(group_role);
        if captain_role.is_none() || group_role.is_none() {
            warn!(member = %tag, "captain or group role missing, assigning what exists");
        }
        member
            .add_roles(&ctx.http, &roles)
            .await
            .map_err(|e| DiscordError::api("add_roles", e))?;
        info!(member = %tag, ?roles, "assigned captain roles");

        // Nickname changes fail on the guild owner; log and carry on.
        if let Err(e) = guild_id
            .edit_member(
                &ctx.http,
                member.user.id,
                EditMember::new().nickname(&captain.nickname),
            )
            .await
        {
            warn!(member = %tag, error = %e, "failed to set nickname");
        }

        Ok(())
    }

    /// Register (or replace) a captain and trigger the join flow.
    pub async fn add_captain(
        &self,
        ctx: &Context,
        msg: &Message,
        guild_id: GuildId,
        user_id: UserId,
        team: &str,
        nick: &str,
        group: &str,
    ) -> Result<()> {
        self.ensure_guild(ctx, guild_id).await?;
        let member = guild_id
            .member(&ctx.http, user_id)
            .await
            .map_err(|e| DiscordError::api("get_member", e))?;
        let tag = member.user.tag();

        {
            let guilds = self.guilds.read().await;
            let Some(host) = guilds.get(&guild_id) else {
                return Ok(());
            };
            if !host.groups.contains_key(group) {
                self.reply(ctx, msg, &format!("Group \"{}\" does not exist", group))
                    .await;
                return Ok(());
            }
        }

        if self
            .guilds
            .read()
            .await
            .get(&guild_id)
            .is_some_and(|h| h.captains.contains_key(&tag))
        {
            self.remove_captain(ctx, msg, guild_id, user_id).await?;
        }

        {
            let mut guilds = self.guilds.write().await;
            if let Some(host) = guilds.get_mut(&guild_id) {
                host.captains
                    .insert(tag.clone(), TeamCaptain::new(&tag, team, nick, group));
            }
        }

        self.handle_member_join(ctx, &member).await
    }

    /// Unregister a captain: strip roles, delete an orphaned team role,
    /// reset the nickname.
    pub async fn remove_captain(
        &self,
        ctx: &Context,
        msg: &Message,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<()> {
        self.ensure_guild(ctx, guild_id).await?;
        let member = guild_id
            .member(&ctx.http, user_id)
            .await
            .map_err(|e| DiscordError::api("get_member", e))?;
        let tag = member.user.tag();

        let mut guilds = self.guilds.write().await;
        let Some(host) = guilds.get_mut(&guild_id) else {
            return Ok(());
        };
        let Some(captain) = host.captains.remove(&tag) else {
            self.reply(
                ctx,
                msg,
                &format!("{} is not a known captain", member.mention()),
            )
            .await;
            return Ok(());
        };

        let team_role_name = host.settings.team_role_name(&captain.team_name);
        let team_role = host.teams.get(&team_role_name).map(|t| t.role);
        let group_role = host.groups.get(&captain.group).copied().flatten();

        let mut to_remove: Vec<RoleId> = Vec::new();
        to_remove.extend(host.special.captain);
        to_remove.extend(group_role);
        to_remove.extend(team_role);
        if let Err(e) = member.remove_roles(&ctx.http, &to_remove).await {
            warn!(member = %tag, error = %e, "failed to remove captain roles");
        }

        // Delete the team role if nobody is left wearing it.
        if let Some(role) = team_role {
            let orphaned = match guild_id.members(&ctx.http, None, None).await {
                Ok(members) => members
                    .iter()
                    .filter(|m| m.user.id != member.user.id)
                    .all(|m| !m.roles.contains(&role)),
                Err(e) => {
                    warn!(error = %e, "failed to list members, keeping team role");
                    false
                }
            };
            if orphaned {
                if let Err(e) = guild_id.delete_role(&ctx.http, role).await {
                    warn!(role = %team_role_name, error = %e, "failed to delete team role");
                } else {
                    info!(role = %team_role_name, "deleted orphaned team role");
                    host.teams.remove(&team_role_name);
                }
            }
        }

        if let Err(e) = guild_id
            .edit_member(&ctx.http, member.user.id, EditMember::new().nickname(""))
            .await
        {
            warn!(member = %tag, error = %e, "failed to reset nickname");
        }

        Ok(())
    }

    /// Reparse the roster, make sure every team role exists, and run the
    /// join flow for members who still have no role.
    pub async fn refresh(&self, ctx: &Context, guild_id: GuildId) -> Result<()> {
        self.ensure_guild(ctx, guild_id).await?;
        let guild = ctx
            .http
            .get_guild(guild_id)
            .await
            .map_err(|e| DiscordError::api("get_guild", e))?;

        {
            let mut guilds = self.guilds.write().await;
            let Some(host) = guilds.get_mut(&guild_id) else {
                return Ok(());
            };
            if let Some(path) = host.settings.captains_csv.clone() {
                host.captains = roster::parse_roster(&path)?;
                info!(count = host.captains.len(), "reparsed captain roster");
            }
            self.cache_group_roles(&guild, host);
        }

        self.create_all_roles(ctx, guild_id).await?;

        let members = guild_id
            .members(&ctx.http, None, None)
            .await
            .map_err(|e| DiscordError::api("get_members", e))?;
        for member in members.iter().filter(|m| m.roles.is_empty()) {
            info!(member = %member.user.tag(), "member without role, revisiting");
            self.handle_member_join(ctx, member).await?;
        }
        Ok(())
    }

    /// Create the team role for every rostered captain.
    pub async fn create_all_roles(&self, ctx: &Context, guild_id: GuildId) -> Result<()> {
        self.ensure_guild(ctx, guild_id).await?;
        let mut guilds = self.guilds.write().await;
        let Some(host) = guilds.get_mut(&guild_id) else {
            return Ok(());
        };
        let team_names: Vec<String> = host
            .captains
            .values()
            .map(|c| c.team_name.clone())
            .collect();
        for team_name in team_names {
            let role = self
                .create_team_role(ctx, guild_id, host, &team_name)
                .await?;
            for captain in host
                .captains
                .values_mut()
                .filter(|c| c.team_name == team_name)
            {
                captain.team_role = Some(role);
            }
        }
        Ok(())
    }

    // ---- matches -------------------------------------------------------

    /// Create a match between two team roles: channel, permissions, draft.
    pub async fn matchup(
        &self,
        ctx: &Context,
        msg: &Message,
        guild_id: GuildId,
        role_a: RoleId,
        role_b: RoleId,
        format: MatchFormat,
    ) -> Result<()> {
        self.ensure_guild(ctx, guild_id).await?;
        let guild = ctx
            .http
            .get_guild(guild_id)
            .await
            .map_err(|e| DiscordError::api("get_guild", e))?;

        let mut guilds = self.guilds.write().await;
        let Some(host) = guilds.get_mut(&guild_id) else {
            return Ok(());
        };

        // Both mentioned roles must be registered teams.
        let resolve = |role_id: RoleId| -> Result<TeamEntry> {
            let role_name = guild
                .roles
                .get(&role_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| role_id.to_string());
            host.teams
                .get(&role_name)
                .cloned()
                .ok_or(DiscordError::UnknownTeamRole { role: role_name })
        };
        let (entry_a, entry_b) = match (resolve(role_a), resolve(role_b)) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(DiscordError::UnknownTeamRole { role }), _)
            | (_, Err(DiscordError::UnknownTeamRole { role })) => {
                self.reply(ctx, msg, &format!("Role \"{}\" is not a known team", role))
                    .await;
                return Ok(());
            }
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };

        let channel_name = format!(
            "match_{}_vs_{}",
            sanitize::channel_fragment(&entry_a.name),
            sanitize::channel_fragment(&entry_b.name)
        );
        let topic = format!("Match {} vs {}", entry_a.name, entry_b.name);

        let channel = match self.find_channel(ctx, guild_id, &channel_name).await? {
            Some(existing) => {
                info!(channel = %channel_name, "reusing existing match channel");
                existing
            }
            None => {
                self.create_match_channel(ctx, guild_id, host, &channel_name, &topic, role_a, role_b)
                    .await?
            }
        };

        let team_a = Team::new(role_a.to_string(), entry_a.name.clone(), role_a.mention().to_string());
        let team_b = Team::new(role_b.to_string(), entry_b.name.clone(), role_b.mention().to_string());

        let draft_result = {
            let mut rng = rand::thread_rng();
            MatchDraft::new(team_a, team_b, format, host.settings.maps.clone(), &mut rng)
        };
        let mut draft =
            match draft_result {
                Ok(draft) => draft,
                Err(err) => {
                    // Misconfigured pool: report to the referee, register nothing.
                    self.reply(ctx, msg, &err.refusal_text()).await;
                    return Err(err.into());
                }
            };

        let notifier = ChannelNotifier::new(ctx.http.clone(), channel.id);
        draft.begin(&notifier).await;

        host.matches.insert(
            channel_name.clone(),
            MatchSession {
                channel: channel.id,
                draft,
            },
        );
        info!(channel = %channel_name, format = ?format, "match registered");
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_match_channel(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        host: &GuildHost,
        name: &str,
        topic: &str,
        role_a: RoleId,
        role_b: RoleId,
    ) -> Result<GuildChannel> {
        let bot_user = ctx
            .http
            .get_current_user()
            .await
            .map_err(|e| DiscordError::api("get_current_user", e))?;

        let read_send = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
        let mut overwrites = vec![
            PermissionOverwrite {
                allow: read_send,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Role(role_a),
            },
            PermissionOverwrite {
                allow: read_send,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Role(role_b),
            },
            PermissionOverwrite {
                allow: read_send,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Member(bot_user.id),
            },
            // Hide the channel from everyone else.
            PermissionOverwrite {
                allow: Permissions::empty(),
                deny: Permissions::VIEW_CHANNEL,
                kind: PermissionOverwriteType::Role(RoleId::new(guild_id.get())),
            },
        ];
        if let Some(referee) = host.special.referee {
            overwrites.push(PermissionOverwrite {
                allow: read_send,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Role(referee),
            });
        }

        let channel = guild_id
            .create_channel(
                &ctx.http,
                CreateChannel::new(name)
                    .kind(ChannelType::Text)
                    .topic(topic)
                    .permissions(overwrites),
            )
            .await
            .map_err(|e| DiscordError::ChannelCreateFailed {
                name: name.to_string(),
                cause: e,
            })?;
        info!(channel = %name, "created match channel");
        Ok(channel)
    }

    /// Whether `member` belongs to either team of the match hosted in
    /// `channel_name`.
    pub async fn is_captain_in_match(
        &self,
        guild_id: GuildId,
        channel_name: &str,
        member: &Member,
    ) -> bool {
        let guilds = self.guilds.read().await;
        let Some(session) = guilds
            .get(&guild_id)
            .and_then(|host| host.matches.get(channel_name))
        else {
            return false;
        };
        member
            .roles
            .iter()
            .any(|role| session.draft.is_in_match(&TeamId(role.to_string())))
    }

    /// `!ban` in a match channel.
    pub async fn ban_map(
        &self,
        ctx: &Context,
        channel: &GuildChannel,
        member: &Member,
        map_token: &str,
        force: bool,
    ) -> Result<()> {
        let mut guilds = self.guilds.write().await;
        let Some(host) = guilds.get_mut(&channel.guild_id) else {
            return Ok(());
        };
        let map = canonical_map(&host.settings.maps, map_token);
        let Some(session) = host.matches.get_mut(&channel.name) else {
            // Not a match channel, nothing to do.
            return Ok(());
        };
        let actor = actor_for(member, &session.draft);
        let notifier = ChannelNotifier::new(ctx.http.clone(), session.channel);
        let _ = session.draft.ban_map(&notifier, &actor, &map, force).await;
        Ok(())
    }

    /// `!pick` in a match channel.
    pub async fn pick_map(
        &self,
        ctx: &Context,
        channel: &GuildChannel,
        member: &Member,
        map_token: &str,
        force: bool,
    ) -> Result<()> {
        let mut guilds = self.guilds.write().await;
        let Some(host) = guilds.get_mut(&channel.guild_id) else {
            return Ok(());
        };
        let map = canonical_map(&host.settings.maps, map_token);
        let Some(session) = host.matches.get_mut(&channel.name) else {
            return Ok(());
        };
        let actor = actor_for(member, &session.draft);
        let notifier = ChannelNotifier::new(ctx.http.clone(), session.channel);
        let _ = session.draft.pick_map(&notifier, &actor, &map, force).await;
        Ok(())
    }

    /// `!side` in a match channel.
    pub async fn choose_side(
        &self,
        ctx: &Context,
        channel: &GuildChannel,
        member: &Member,
        side_token: &str,
        force: bool,
    ) -> Result<()> {
        let mut guilds = self.guilds.write().await;
        let Some(session) = guilds
            .get_mut(&channel.guild_id)
            .and_then(|host| host.matches.get_mut(&channel.name))
        else {
            return Ok(());
        };
        let actor = actor_for(member, &session.draft);
        let notifier = ChannelNotifier::new(ctx.http.clone(), session.channel);
        let side = sanitize::token_key(side_token);
        let _ = session
            .draft
            .choose_side(&notifier, &actor, &side, force)
            .await;
        Ok(())
    }

    // ---- housekeeping --------------------------------------------------

    /// Delete every team role and strip every rostered captain.
    pub async fn wipe_teams(&self, ctx: &Context, guild_id: GuildId) -> Result<()> {
        self.ensure_guild(ctx, guild_id).await?;
        let mut guilds = self.guilds.write().await;
        let Some(host) = guilds.get_mut(&guild_id) else {
            return Ok(());
        };

        for (role_name, entry) in host.teams.drain() {
            if let Err(e) = guild_id.delete_role(&ctx.http, entry.role).await {
                warn!(role = %role_name, error = %e, "failed to delete team role");
            } else {
                info!(role = %role_name, "deleted team role");
            }
        }

        let members = guild_id
            .members(&ctx.http, None, None)
            .await
            .map_err(|e| DiscordError::api("get_members", e))?;
        for member in &members {
            let tag = member.user.tag();
            let Some(captain) = host.captains.get(&tag) else {
                continue;
            };
            info!(member = %tag, "stripping captain");
            let group_role = host.groups.get(&captain.group).copied().flatten();
            let mut to_remove: Vec<RoleId> = Vec::new();
            to_remove.extend(host.special.captain);
            to_remove.extend(group_role);
            if let Err(e) = member.remove_roles(&ctx.http, &to_remove).await {
                warn!(member = %tag, error = %e, "failed to remove roles");
            }
            if let Err(e) = guild_id
                .edit_member(&ctx.http, member.user.id, EditMember::new().nickname(""))
                .await
            {
                warn!(member = %tag, error = %e, "failed to reset nickname");
            }
        }
        host.captains.clear();
        Ok(())
    }

    /// Delete every match channel the bot created.
    pub async fn wipe_matches(&self, ctx: &Context, guild_id: GuildId) -> Result<()> {
        self.ensure_guild(ctx, guild_id).await?;
        let mut guilds = self.guilds.write().await;
        let Some(host) = guilds.get_mut(&guild_id) else {
            return Ok(());
        };
        for (name, session) in host.matches.drain() {
            if let Err(e) = session.channel.delete(&ctx.http).await {
                warn!(channel = %name, error = %e, "failed to delete match channel");
            } else {
                info!(channel = %name, "deleted match channel");
            }
        }
        Ok(())
    }

    /// Delete all unpinned messages in a channel, reporting progress.
    pub async fn wipe_messages(
        &self,
        ctx: &Context,
        msg: &Message,
        target: ChannelId,
    ) -> Result<()> {
        let mut to_delete: Vec<Message> = Vec::new();
        let mut before: Option<Message> = None;
        loop {
            let mut request = GetMessages::new().limit(100);
            if let Some(last) = &before {
                request = request.before(last.id);
            }
            let batch = target
                .messages(&ctx.http, request)
                .await
                .map_err(|e| DiscordError::api("get_messages", e))?;
            let done = batch.len() < 100;
            before = batch.last().cloned();
            to_delete.extend(batch.into_iter().filter(|m| !m.pinned));
            if done {
                break;
            }
        }

        let mut count = to_delete.len();
        let mut progress = msg
            .channel_id
            .say(
                &ctx.http,
                format!(
                    "{} Clearing {} message(s)... (this might take a while)",
                    msg.author.mention(),
                    count
                ),
            )
            .await
            .map_err(|e| DiscordError::api("send_message", e))?;

        for message in to_delete {
            if let Err(e) = message.delete(&ctx.http).await {
                count -= 1;
                warn!(channel = %target, error = %e, "failed to delete message");
            }
        }

        if let Err(e) = progress
            .edit(
                &ctx.http,
                EditMessage::new().content(format!(
                    "{} Deleted {} messages.",
                    msg.author.mention(),
                    count
                )),
            )
            .await
        {
            warn!(error = %e, "failed to edit progress message");
        }
        info!(channel = %target, count, "wiped messages");
        Ok(())
    }

    /// Fan a message out to the configured broadcast rooms.
    pub async fn announce(&self, ctx: &Context, guild_id: GuildId, text: &str) -> Result<()> {
        self.ensure_guild(ctx, guild_id).await?;
        let rooms = {
            let guilds = self.guilds.read().await;
            guilds
                .get(&guild_id)
                .and_then(|host| host.settings.broadcast.get("announcement").cloned())
                .unwrap_or_default()
        };
        if rooms.is_empty() {
            warn!("no broadcast configuration for announcements");
            return Ok(());
        }

        let channels = guild_id
            .channels(&ctx.http)
            .await
            .map_err(|e| DiscordError::api("get_channels", e))?;
        for room in rooms {
            match channels.values().find(|c| c.name == room) {
                Some(channel) => {
                    if let Err(e) = channel.id.say(&ctx.http, text).await {
                        warn!(channel = %room, error = %e, "no permission to write");
                    }
                }
                None => warn!(channel = %room, "missing broadcast channel"),
            }
        }
        Ok(())
    }

    /// Announce in a match channel that `member` will stream the match.
    pub async fn stream_match(
        &self,
        ctx: &Context,
        msg: &Message,
        guild_id: GuildId,
        match_id: &str,
    ) -> Result<()> {
        let Some(channel) = self.find_channel(ctx, guild_id, match_id).await? else {
            self.reply(ctx, msg, "This match does not exist!").await;
            return Ok(());
        };

        let streamer = msg
            .author_nick(&ctx.http)
            .await
            .unwrap_or_else(|| msg.author.name.clone());
        let notice = format!(
            ":eye::popcorn: _**{}** will stream this match!_ :movie_camera::satellite:\n\
             :arrow_forward: _Teams in a streamed match get an additional 10 minutes to prepare._",
            streamer
        );
        channel
            .id
            .say(&ctx.http, notice)
            .await
            .map_err(|e| DiscordError::api("send_message", e))?;
        self.reply(ctx, msg, "roger!").await;
        info!(channel = %match_id, streamer = %streamer, "stream notice sent");
        Ok(())
    }

    /// Export the full member list as a CSV attachment.
    pub async fn export_members(
        &self,
        ctx: &Context,
        msg: &Message,
        guild_id: GuildId,
    ) -> Result<()> {
        let members = guild_id
            .members(&ctx.http, None, None)
            .await
            .map_err(|e| DiscordError::api("get_members", e))?;
        let tags: Vec<String> = members.iter().map(|m| m.user.tag()).collect();
        let csv_bytes = roster::members_csv(&tags);

        let content = format!(
            "{} Here is the list of all {} members in this Discord server",
            msg.author.mention(),
            tags.len()
        );
        msg.channel_id
            .send_files(
                &ctx.http,
                [CreateAttachment::bytes(csv_bytes, "members.csv")],
                CreateMessage::new().content(content),
            )
            .await
            .map_err(|e| DiscordError::api("send_files", e))?;
        info!(count = tags.len(), "sent member list");
        Ok(())
    }

    async fn find_channel(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        name: &str,
    ) -> Result<Option<GuildChannel>> {
        let channels = guild_id
            .channels(&ctx.http)
            .await
            .map_err(|e| DiscordError::api("get_channels", e))?;
        Ok(channels.into_values().find(|c| c.name == name))
    }

    /// Look up a channel for `!say`, by mention or by name.
    pub async fn resolve_channel(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        token: &str,
    ) -> Result<Option<ChannelId>> {
        if let Some(id) = crate::commands::parse_channel_mention(token) {
            return Ok(Some(id));
        }
        let name = token.trim_start_matches('#');
        Ok(self.find_channel(ctx, guild_id, name).await?.map(|c| c.id))
    }
}

/// Resolve a user token to the configured map name where possible; unknown
/// tokens pass through so the draft engine issues the refusal.
fn canonical_map(maps: &[String], token: &str) -> String {
    sanitize::resolve_map_token(maps, token)
        .map(str::to_string)
        .unwrap_or_else(|| token.to_string())
}

/// Resolve a member to the draft actor: their mention plus whichever of the
/// two bound teams their roles place them on.
fn actor_for(member: &Member, draft: &MatchDraft) -> Actor {
    let team = member
        .roles
        .iter()
        .map(|role| TeamId(role.to_string()))
        .find(|id| draft.is_in_match(id));
    Actor {
        mention: member.mention().to_string(),
        team,
    }
}

fn lookup_role(guild: &serenity::all::PartialGuild, name: &str) -> Option<RoleId> {
    guild.role_by_name(name).map(|role| role.id)
}
