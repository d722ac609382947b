//! Append-only in-memory message log.
//!
//! Messages live for the process lifetime. After append, only the
//! `reactions` sequence of a message is ever mutated; everything else is
//! frozen. An id → position index gives the reaction aggregator O(1)
//! lookups into the log.

use std::collections::HashMap;

use uuid::Uuid;

use crate::events::{Attachment, Message};
use crate::room::room_key;

/// Fields of a message as supplied by the sending client. Id and
/// timestamp are deliberately absent: the server assigns both.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub from: String,
    pub content: String,
    pub to: Option<String>,
    pub attachment: Option<Attachment>,
}

/// Append-only log of every message the relay has routed.
#[derive(Default)]
pub struct MessageStore {
    log: Vec<Message>,
    /// Message id to position in `log`.
    index: HashMap<String, usize>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a message, assigning a fresh id and the server-side
    /// timestamp. Returns a copy of the stored message for delivery.
    pub fn append(&mut self, draft: MessageDraft, timestamp: i64) -> Message {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            from: draft.from,
            content: draft.content,
            timestamp,
            to: draft.to,
            attachment: draft.attachment,
            reactions: Vec::new(),
        };
        self.index.insert(message.id.clone(), self.log.len());
        self.log.push(message.clone());
        message
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.index.get(id).map(|&pos| &self.log[pos])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Message> {
        match self.index.get(id) {
            Some(&pos) => Some(&mut self.log[pos]),
            None => None,
        }
    }

    /// All private messages between `a` and `b`, in append order.
    pub fn query_room(&self, a: &str, b: &str) -> Vec<Message> {
        let key = room_key(a, b);
        self.log
            .iter()
            .filter(|message| match &message.to {
                Some(to) => room_key(&message.from, to) == key,
                None => false,
            })
            .cloned()
            .collect()
    }

    /// All public messages (no recipient), in append order.
    pub fn query_public(&self) -> Vec<Message> {
        self.log
            .iter()
            .filter(|message| message.to.is_none())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(from: &str, content: &str, to: Option<&str>) -> MessageDraft {
        MessageDraft {
            from: from.to_string(),
            content: content.to_string(),
            to: to.map(str::to_string),
            attachment: None,
        }
    }

    #[test]
    fn test_append_assigns_id_and_timestamp() {
        // given:
        let mut store = MessageStore::new();

        // when:
        let message = store.append(draft("alice", "hi", None), 1700000000000);

        // then:
        assert!(!message.id.is_empty());
        assert_eq!(message.timestamp, 1700000000000);
        assert_eq!(message.from, "alice");
        assert_eq!(message.content, "hi");
        assert_eq!(message.to, None);
        assert!(message.reactions.is_empty());
        assert_eq!(store.get(&message.id), Some(&message));
    }

    #[test]
    fn test_append_assigns_unique_ids() {
        // given:
        let mut store = MessageStore::new();

        // when:
        let first = store.append(draft("alice", "one", None), 1);
        let second = store.append(draft("alice", "two", None), 2);

        // then:
        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_append_preserves_attachment() {
        // given:
        let mut store = MessageStore::new();
        let attachment = Attachment {
            kind: "image/png".to_string(),
            name: "cat.png".to_string(),
            data: "aGVsbG8=".to_string(),
        };
        let draft = MessageDraft {
            from: "alice".to_string(),
            content: "see attached".to_string(),
            to: Some("bob".to_string()),
            attachment: Some(attachment.clone()),
        };

        // when:
        let message = store.append(draft, 42);

        // then:
        assert_eq!(message.attachment, Some(attachment));
        assert_eq!(message.to, Some("bob".to_string()));
    }

    #[test]
    fn test_query_public_filters_out_private_messages() {
        // given:
        let mut store = MessageStore::new();
        store.append(draft("alice", "hello everyone", None), 1);
        store.append(draft("alice", "secret", Some("bob")), 2);
        store.append(draft("bob", "hi all", None), 3);

        // when:
        let public = store.query_public();

        // then: only public messages, in append order
        let contents: Vec<&str> = public.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hello everyone", "hi all"]);
    }

    #[test]
    fn test_query_room_matches_unordered_pair() {
        // given:
        let mut store = MessageStore::new();
        store.append(draft("alice", "to bob", Some("bob")), 1);
        store.append(draft("bob", "to alice", Some("alice")), 2);
        store.append(draft("alice", "to carol", Some("carol")), 3);
        store.append(draft("alice", "public", None), 4);

        // when:
        let room_ab = store.query_room("bob", "alice");

        // then: both directions of the pair, nothing else
        let contents: Vec<&str> = room_ab.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["to bob", "to alice"]);
    }

    #[test]
    fn test_query_room_preserves_append_order() {
        // given:
        let mut store = MessageStore::new();
        for i in 0..5 {
            let (from, to) = if i % 2 == 0 {
                ("alice", "bob")
            } else {
                ("bob", "alice")
            };
            store.append(draft(from, &format!("msg {i}"), Some(to)), i);
        }

        // when:
        let room = store.query_room("alice", "bob");

        // then:
        let timestamps: Vec<i64> = room.iter().map(|m| m.timestamp).collect();
        assert_eq!(timestamps, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_get_unknown_id_returns_none() {
        // given:
        let store = MessageStore::new();

        // when:
        let result = store.get("no-such-id");

        // then:
        assert!(result.is_none());
    }
}
