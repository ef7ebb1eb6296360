//! The gateway event handler: command parsing, permission tiers, dispatch.
//!
//! Tier model, most to least privileged: admin (Manage Roles permission),
//! referee (configured role, or admin), captain-in-match (member of either
//! team of the channel's match, or referee), streamer (configured role, or
//! admin). Referees issuing draft commands act with `force`: they bypass
//! turn ownership but never pool or lifecycle validity.

use std::sync::Arc;

use serenity::all::{Channel, GatewayIntents, GuildChannel, GuildId, Member, Message, Ready};
use serenity::async_trait;
use serenity::client::{Client, Context, EventHandler};
use serenity::model::permissions::Permissions;
use tracing::{error, info, warn};

use cupkeeper_core::MatchFormat;

use crate::commands::{first_token, parse_channel_mention, split_command, usage};
use crate::config::BotConfig;
use crate::error::{DiscordError, Result};
use crate::keeper::Keeper;

pub struct CupKeeperBot {
    keeper: Arc<Keeper>,
}

impl CupKeeperBot {
    pub fn new(config: BotConfig) -> Self {
        Self {
            keeper: Arc::new(Keeper::new(config)),
        }
    }
}

/// Resolved permission tiers for one message.
#[derive(Debug, Clone, Copy)]
struct Tier {
    admin: bool,
    referee: bool,
    streamer: bool,
    captain_in_match: bool,
}

#[async_trait]
impl EventHandler for CupKeeperBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        for guild in &ready.guilds {
            match self.keeper.init_guild(&ctx, guild.id).await {
                Ok(()) => {}
                Err(DiscordError::GuildNotConfigured { .. }) => {}
                Err(e) => error!(guild = %guild.id, error = %e, "failed to initialize guild"),
            }
        }
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        if let Err(e) = self.keeper.handle_member_join(&ctx, &new_member).await {
            error!(member = %new_member.user.tag(), error = %e, "member join handling failed");
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore our own and other bots' messages.
        if msg.author.bot {
            return;
        }

        let Some(guild_id) = msg.guild_id else {
            self.handle_dm(&ctx, &msg).await;
            return;
        };

        let Some((command, args)) = split_command(self.keeper.prefix(), msg.content.trim())
        else {
            return;
        };

        match self.keeper.ensure_guild(&ctx, guild_id).await {
            Ok(()) => {}
            Err(DiscordError::GuildNotConfigured { .. }) => return,
            Err(e) => {
                error!(error = %e, "guild initialization failed");
                return;
            }
        }

        let Ok(member) = guild_id.member(&ctx.http, msg.author.id).await else {
            return;
        };
        let channel = match msg.channel_id.to_channel(&ctx).await {
            Ok(Channel::Guild(channel)) => channel,
            _ => return,
        };

        let tier = self.resolve_tier(&ctx, guild_id, &channel, &member).await;
        if let Err(e) = self
            .dispatch(&ctx, &msg, guild_id, &channel, &member, tier, command, args)
            .await
        {
            error!(command, error = %e, "command failed");
        }
    }
}

impl CupKeeperBot {
    async fn handle_dm(&self, ctx: &Context, msg: &Message) {
        info!(author = %msg.author.tag(), "DM received");
        let reply = ":wave: Hello there! \
                     I am sorry, I cannot answer your question, I am just a bot! \
                     Feel free to ask a referee or admin instead :robot:";
        if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
            warn!(error = %e, "failed to answer DM");
        }
    }

    async fn resolve_tier(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        channel: &GuildChannel,
        member: &Member,
    ) -> Tier {
        // Manage Roles doubles as the admin permission.
        let admin = match ctx.http.get_guild(guild_id).await {
            Ok(guild) => guild
                .user_permissions_in(channel, member)
                .contains(Permissions::MANAGE_ROLES),
            Err(e) => {
                warn!(error = %e, "failed to resolve permissions");
                false
            }
        };

        let special = self.keeper.special_roles(guild_id).await;
        let has = |role: Option<serenity::all::RoleId>| {
            role.is_some_and(|role| member.roles.contains(&role))
        };
        let referee = admin || has(special.referee);
        let streamer = admin || has(special.streamer);
        let captain_in_match = referee
            || self
                .keeper
                .is_captain_in_match(guild_id, &channel.name, member)
                .await;

        Tier {
            admin,
            referee,
            streamer,
            captain_in_match,
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch(
        &self,
        ctx: &Context,
        msg: &Message,
        guild_id: GuildId,
        channel: &GuildChannel,
        member: &Member,
        tier: Tier,
        command: &str,
        args: &str,
    ) -> Result<()> {
        let keeper = &self.keeper;
        match command {
            // ADMIN COMMANDS
            "refresh" if tier.admin => keeper.refresh(ctx, guild_id).await,
            "create_teams" if tier.admin => keeper.create_all_roles(ctx, guild_id).await,
            "wipe_teams" if tier.admin => keeper.wipe_teams(ctx, guild_id).await,
            "wipe_matches" if tier.admin => keeper.wipe_matches(ctx, guild_id).await,
            "wipe_messages" if tier.admin => {
                match first_token(args).and_then(parse_channel_mention) {
                    Some(target) => keeper.wipe_messages(ctx, msg, target).await,
                    None => {
                        self.usage_reply(ctx, msg, command).await;
                        Ok(())
                    }
                }
            }
            "announce" if tier.admin => keeper.announce(ctx, guild_id, args).await,
            "members" if tier.admin => keeper.export_members(ctx, msg, guild_id).await,

            // REF COMMANDS
            "add_captain" if tier.referee => {
                let parts: Vec<&str> = args.split_whitespace().collect();
                if msg.mentions.len() == 1 && parts.len() >= 4 {
                    keeper
                        .add_captain(
                            ctx,
                            msg,
                            guild_id,
                            msg.mentions[0].id,
                            parts[1],
                            parts[2],
                            parts[3],
                        )
                        .await
                } else {
                    self.usage_reply(ctx, msg, command).await;
                    Ok(())
                }
            }
            "remove_captain" if tier.referee => {
                if msg.mentions.len() == 1 {
                    keeper
                        .remove_captain(ctx, msg, guild_id, msg.mentions[0].id)
                        .await
                } else {
                    self.usage_reply(ctx, msg, command).await;
                    Ok(())
                }
            }
            "bo1" | "bo2" | "bo3" if tier.referee => {
                let format = match command {
                    "bo2" => MatchFormat::Bo2,
                    "bo3" => MatchFormat::Bo3,
                    _ => MatchFormat::Bo1,
                };
                if msg.mention_roles.len() == 2 {
                    keeper
                        .matchup(
                            ctx,
                            msg,
                            guild_id,
                            msg.mention_roles[0],
                            msg.mention_roles[1],
                            format,
                        )
                        .await
                } else {
                    self.usage_reply(ctx, msg, command).await;
                    Ok(())
                }
            }
            "say" if tier.referee => {
                let Some(target) = first_token(args) else {
                    self.usage_reply(ctx, msg, command).await;
                    return Ok(());
                };
                let text = args[target.len()..].trim();
                if text.is_empty() {
                    self.usage_reply(ctx, msg, command).await;
                    return Ok(());
                }
                match keeper.resolve_channel(ctx, guild_id, target).await? {
                    Some(channel_id) => {
                        if let Err(e) = channel_id.say(&ctx.http, text).await {
                            warn!(error = %e, "say failed");
                            keeper
                                .reply(ctx, msg, &format!("I do not see channel `{}`", target))
                                .await;
                        }
                        Ok(())
                    }
                    None => {
                        keeper
                            .reply(ctx, msg, &format!("No channel named `{}`", target))
                            .await;
                        Ok(())
                    }
                }
            }

            // CAPTAIN COMMANDS (referees act with force)
            "ban" if tier.captain_in_match => {
                keeper
                    .ban_map(
                        ctx,
                        channel,
                        member,
                        first_token(args).unwrap_or(""),
                        tier.referee,
                    )
                    .await
            }
            "pick" if tier.captain_in_match => {
                keeper
                    .pick_map(
                        ctx,
                        channel,
                        member,
                        first_token(args).unwrap_or(""),
                        tier.referee,
                    )
                    .await
            }
            "side" if tier.captain_in_match => {
                keeper
                    .choose_side(
                        ctx,
                        channel,
                        member,
                        first_token(args).unwrap_or(""),
                        tier.referee,
                    )
                    .await
            }

            // STREAMER COMMANDS
            "stream" if tier.streamer => match first_token(args) {
                Some(match_id) => keeper.stream_match(ctx, msg, guild_id, match_id).await,
                None => {
                    self.usage_reply(ctx, msg, command).await;
                    Ok(())
                }
            },

            // Unknown commands and insufficient tiers fall through silently.
            _ => Ok(()),
        }
    }

    async fn usage_reply(&self, ctx: &Context, msg: &Message, command: &str) {
        if let Some(usage) = usage(command) {
            self.keeper
                .reply(
                    ctx,
                    msg,
                    &format!("Too much or not enough arguments:\n```{}```", usage),
                )
                .await;
        }
    }
}

/// Build the serenity client with the gateway intents the bot needs.
pub async fn create_client(config: BotConfig) -> Result<Client> {
    let token = config.token.clone();
    let handler = CupKeeperBot::new(config);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    Client::builder(&token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| DiscordError::api("client_builder", e))
}
