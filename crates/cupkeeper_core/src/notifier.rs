//! The engine's only outward-facing seam.
//!
//! The draft engine supplies human-readable strings; delivery, retries and
//! rendering belong to the implementor. Calls are fire-and-forget: a failed
//! notification never rolls back a state transition, because the
//! authoritative state is the action log, not the message announcing it.

use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one line into the match channel.
    async fn send(&self, text: &str);

    /// Deliver an ordered block of lines (welcome text, final summary).
    /// Implementors may batch these into a single message.
    async fn announce_sequence(&self, lines: &[String]) {
        for line in lines {
            self.send(line).await;
        }
    }
}

/// Discards everything. Useful when replaying a draft without a channel.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, _text: &str) {}
}

/// Captures every line in memory, in delivery order.
#[derive(Default)]
pub struct RecordingNotifier {
    lines: std::sync::Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("notifier lock poisoned").clone()
    }

    pub fn last(&self) -> Option<String> {
        self.lines
            .lock()
            .expect("notifier lock poisoned")
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().expect("notifier lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) {
        self.lines
            .lock()
            .expect("notifier lock poisoned")
            .push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.send("first").await;
        notifier
            .announce_sequence(&["second".to_string(), "third".to_string()])
            .await;
        assert_eq!(notifier.lines(), vec!["first", "second", "third"]);
    }
}
