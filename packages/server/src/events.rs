//! Wire protocol types for the relay WebSocket.
//!
//! Inbound events arrive as JSON objects tagged by a kebab-case `type`
//! field. Outbound events are individual structs that carry the same
//! `type` discriminant, so every payload on the wire is self-describing.

use serde::{Deserialize, Serialize};

/// Event discriminant, serialized into the `type` field of outbound payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    OnlineUsers,
    PreviousMessages,
    Message,
    MessageReaction,
}

/// File attachment carried by a message. The relay treats `data` as an
/// opaque string (clients send base64 text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub data: String,
}

/// One (emoji, contributing-username) association on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEntry {
    pub emoji: String,
    pub username: String,
}

/// A chat message as stored and as sent to clients.
///
/// `id` and `timestamp` are always server-assigned; only `reactions` is
/// ever mutated after the message enters the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from: String,
    pub content: String,
    /// Unix timestamp in milliseconds, from the server clock.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    pub reactions: Vec<ReactionEntry>,
}

/// Direction of a reaction toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    Add,
    Remove,
}

/// Client → relay events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundEvent {
    /// Switch the connection's active private room, or back to the
    /// public channel when `targetUsername` is absent.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        #[serde(default)]
        target_username: Option<String>,
    },
    /// Send a public message, or a private one when `to` is present.
    SendMessage {
        content: String,
        #[serde(default)]
        to: Option<String>,
        #[serde(default)]
        attachment: Option<Attachment>,
    },
    /// Toggle a reaction on a stored message.
    #[serde(rename_all = "camelCase")]
    React {
        message_id: String,
        emoji: String,
        action: ReactionAction,
    },
    /// Ask for a fresh presence broadcast.
    RequestOnlineUsers,
}

/// Presence snapshot, broadcast to every connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnlineUsersEvent {
    pub r#type: EventType,
    pub users: Vec<String>,
}

impl OnlineUsersEvent {
    pub fn new(users: Vec<String>) -> Self {
        Self {
            r#type: EventType::OnlineUsers,
            users,
        }
    }
}

/// Room or public history, sent to the requesting connection only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviousMessagesEvent {
    pub r#type: EventType,
    pub messages: Vec<Message>,
}

impl PreviousMessagesEvent {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            r#type: EventType::PreviousMessages,
            messages,
        }
    }
}

/// A routed chat message; the message fields are flattened next to `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEvent {
    pub r#type: EventType,
    #[serde(flatten)]
    pub message: Message,
}

impl MessageEvent {
    pub fn new(message: Message) -> Self {
        Self {
            r#type: EventType::Message,
            message,
        }
    }
}

/// A reaction state change, broadcast to the scope of the reacted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReactionEvent {
    pub r#type: EventType,
    pub message_id: String,
    pub emoji: String,
    pub username: String,
    pub action: ReactionAction,
}

impl MessageReactionEvent {
    pub fn new(message_id: String, emoji: String, username: String, action: ReactionAction) -> Self {
        Self {
            r#type: EventType::MessageReaction,
            message_id,
            emoji,
            username,
            action,
        }
    }
}
