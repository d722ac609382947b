//! Room key derivation and delivery scoping.
//!
//! A room is not stored anywhere; it is a key computed on demand from
//! the two participant usernames and used to filter subscriptions and
//! history.

use crate::events::Message;

/// Separator between the two usernames in a room key.
pub const ROOM_KEY_SEPARATOR: char = '-';

/// Compute the room key for an unordered pair of usernames.
///
/// The usernames are sorted lexicographically before joining, so the
/// key is the same regardless of argument order.
pub fn room_key(a: &str, b: &str) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    format!("{first}{ROOM_KEY_SEPARATOR}{second}")
}

/// Where an event should be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryScope {
    /// Every connected client.
    Public,
    /// Connections currently subscribed to the given room key.
    Room(String),
}

/// Delivery scope of a stored message: its room when it has a
/// recipient, the public channel otherwise.
pub fn message_scope(message: &Message) -> DeliveryScope {
    match &message.to {
        Some(to) => DeliveryScope::Room(room_key(&message.from, to)),
        None => DeliveryScope::Public,
    }
}
