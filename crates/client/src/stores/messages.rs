//! Unified message feed for global, private and room chat.
//!
//! All text messages live in one append-only sequence. Conversations and rooms
//! are read-time projections over it, so there is exactly one copy of every
//! message and insertion order is display order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Broadcast,
    Private,
    Room,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub sender: String,
    /// Recipient for private messages, room name for room messages.
    pub target: Option<String>,
    pub text: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn broadcast(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Broadcast,
            sender: sender.into(),
            target: None,
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn private(
        sender: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Private,
            sender: sender.into(),
            target: Some(to.into()),
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn room(
        room: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            kind: MessageKind::Room,
            sender: sender.into(),
            target: Some(room.into()),
            text: text.into(),
            timestamp,
        }
    }

    fn target_is(&self, name: &str) -> bool {
        self.target.as_deref() == Some(name)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageFeed {
    messages: Vec<ChatMessage>,
}

impl MessageFeed {
    /// Append-only; nothing here ever removes or reorders.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn broadcasts(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.kind == MessageKind::Broadcast)
    }

    /// Private messages sent or received by `me`.
    pub fn private_for<'a>(&'a self, me: &'a str) -> impl Iterator<Item = &'a ChatMessage> + 'a {
        self.messages
            .iter()
            .filter(move |m| m.kind == MessageKind::Private && (m.sender == me || m.target_is(me)))
    }

    /// The conversation between `me` and `partner`, both directions.
    pub fn conversation<'a>(
        &'a self,
        me: &'a str,
        partner: &'a str,
    ) -> impl Iterator<Item = &'a ChatMessage> + 'a {
        self.messages.iter().filter(move |m| {
            m.kind == MessageKind::Private
                && ((m.sender == me && m.target_is(partner))
                    || (m.sender == partner && m.target_is(me)))
        })
    }

    pub fn room<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a ChatMessage> + 'a {
        self.messages
            .iter()
            .filter(move |m| m.kind == MessageKind::Room && m.target_is(room))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> MessageFeed {
        let mut feed = MessageFeed::default();
        feed.push(ChatMessage::broadcast("alice", "hi all"));
        feed.push(ChatMessage::private("alice", "bob", "psst"));
        feed.push(ChatMessage::room("general", "carol", "yo", None));
        feed.push(ChatMessage::private("carol", "alice", "hey"));
        feed.push(ChatMessage::private("bob", "alice", "what"));
        feed.push(ChatMessage::private("bob", "carol", "not for alice"));
        feed
    }

    #[test]
    fn conversation_is_both_directions_in_order() {
        let feed = feed();
        let texts: Vec<_> = feed
            .conversation("alice", "bob")
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, ["psst", "what"]);
    }

    #[test]
    fn private_for_excludes_third_parties() {
        let feed = feed();
        assert_eq!(feed.private_for("alice").count(), 3);
    }

    #[test]
    fn projections_partition_by_kind() {
        let feed = feed();
        assert_eq!(feed.broadcasts().count(), 1);
        assert_eq!(feed.room("general").count(), 1);
        assert_eq!(feed.room("random").count(), 0);
        assert_eq!(feed.len(), 6);
    }
}
