//! Reaction aggregation: toggle-style add/remove of (emoji, username)
//! entries on stored messages.
//!
//! Each (message, emoji, username) triple is either absent or present.
//! `add` on a present entry and `remove` on an absent one are no-ops and
//! produce no broadcast.

use crate::events::{ReactionAction, ReactionEntry};
use crate::room::{DeliveryScope, message_scope};
use crate::store::MessageStore;

/// A reaction state change to broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionUpdate {
    pub message_id: String,
    pub emoji: String,
    pub username: String,
    pub action: ReactionAction,
    /// Reaction visibility mirrors the visibility of the reacted message.
    pub scope: DeliveryScope,
}

/// Result of applying a reaction toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// State changed; broadcast the update to its scope.
    Applied(ReactionUpdate),
    /// The toggle was a no-op (duplicate add, or remove of an absent entry).
    NoChange,
    /// The message id does not resolve to a stored message.
    UnknownMessage,
}

/// Apply a reaction toggle to the stored message, mutating its
/// `reactions` sequence in place.
pub fn apply(
    store: &mut MessageStore,
    message_id: &str,
    emoji: &str,
    username: &str,
    action: ReactionAction,
) -> ReactionOutcome {
    let Some(message) = store.get_mut(message_id) else {
        return ReactionOutcome::UnknownMessage;
    };

    let present = message
        .reactions
        .iter()
        .any(|entry| entry.emoji == emoji && entry.username == username);

    match (action, present) {
        (ReactionAction::Add, false) => {
            message.reactions.push(ReactionEntry {
                emoji: emoji.to_string(),
                username: username.to_string(),
            });
        }
        (ReactionAction::Remove, true) => {
            message
                .reactions
                .retain(|entry| !(entry.emoji == emoji && entry.username == username));
        }
        _ => return ReactionOutcome::NoChange,
    }

    ReactionOutcome::Applied(ReactionUpdate {
        message_id: message_id.to_string(),
        emoji: emoji.to_string(),
        username: username.to_string(),
        action,
        scope: message_scope(message),
    })
}
