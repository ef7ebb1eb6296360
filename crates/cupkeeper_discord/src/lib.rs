//! Cupkeeper Discord - chat platform integration
//!
//! Everything that talks to Discord lives here: the gateway event handler,
//! prefix-command dispatch with permission tiers, the captain/team roster,
//! role and match-channel management, and the concrete [`Notifier`] that
//! delivers draft announcements into a match channel.
//!
//! [`Notifier`]: cupkeeper_core::Notifier

pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod keeper;
pub mod notifier;
pub mod roster;
pub mod sanitize;

pub use bot::{CupKeeperBot, create_client};
pub use config::{BotConfig, GuildSettings};
pub use error::{DiscordError, Result};
pub use keeper::Keeper;
pub use notifier::ChannelNotifier;

// Re-export serenity for consumers wiring up the client
pub use serenity;
