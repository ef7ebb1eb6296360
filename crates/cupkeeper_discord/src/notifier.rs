//! Delivery of draft announcements into a match channel.
//!
//! The draft engine fires and forgets; this notifier owns retry-on-transient
//! failure and Discord's message length limit. A notification that
//! ultimately cannot be delivered is logged and dropped; the draft state has
//! already moved on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::ChannelId;
use serenity::http::Http;
use tracing::warn;

use cupkeeper_core::Notifier;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(5);
const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// [`Notifier`] implementation bound to one Discord channel.
pub struct ChannelNotifier {
    http: Arc<Http>,
    channel: ChannelId,
}

impl ChannelNotifier {
    pub fn new(http: Arc<Http>, channel: ChannelId) -> Self {
        Self { http, channel }
    }

    async fn deliver(&self, text: &str) {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.channel.say(&self.http, text).await {
                Ok(_) => return,
                Err(e) => {
                    warn!(
                        channel = %self.channel,
                        attempt,
                        error = %e,
                        "failed to deliver notification"
                    );
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }
        warn!(channel = %self.channel, "giving up on notification");
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn send(&self, text: &str) {
        for chunk in split_message(text, DISCORD_MESSAGE_LIMIT) {
            self.deliver(&chunk).await;
        }
    }

    /// Welcome blocks and summaries go out as one message where they fit.
    async fn announce_sequence(&self, lines: &[String]) {
        self.send(&lines.join("\n")).await;
    }
}

/// Split a message on line boundaries so each chunk fits the length limit.
fn split_message(content: &str, max_length: usize) -> Vec<String> {
    if content.len() <= max_length {
        return vec![content.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        if current.len() + line.len() + 1 > max_length {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            if line.len() > max_length {
                // A single oversized line gets hard-split.
                for chunk in line.chars().collect::<Vec<_>>().chunks(max_length) {
                    chunks.push(chunk.iter().collect());
                }
                continue;
            }
            current = line.to_string();
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_messages_stay_whole() {
        assert_eq!(split_message("hello", 2000), vec!["hello"]);
    }

    #[test]
    fn splits_on_line_boundaries() {
        let text = format!("{}\n{}", "a".repeat(12), "b".repeat(12));
        let chunks = split_message(&text, 16);
        assert_eq!(chunks, vec!["a".repeat(12), "b".repeat(12)]);
    }

    #[test]
    fn oversized_single_line_is_hard_split() {
        let chunks = split_message(&"x".repeat(45), 20);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= 20));
    }
}
