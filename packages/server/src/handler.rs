//! WebSocket connection handling and inbound event dispatch.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    events::{
        Attachment, InboundEvent, MessageEvent, MessageReactionEvent, PreviousMessagesEvent,
        ReactionAction,
    },
    presence,
    reaction::{self, ReactionOutcome},
    registry::ConnectionId,
    room::{DeliveryScope, room_key},
    state::AppState,
    store::MessageDraft,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(default)]
    pub username: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let username = query.username.unwrap_or_default();

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = Uuid::new_v4();

    // Bind the claimed username and broadcast the new presence set
    {
        let mut relay = state.relay.lock().await;
        let evicted = match relay.registry.bind(connection_id, &username, tx) {
            Ok(evicted) => evicted,
            Err(e) => {
                tracing::warn!("Rejecting connection: {}", e);
                return Err(StatusCode::UNAUTHORIZED);
            }
        };
        if let Some(old) = evicted {
            tracing::info!(
                "Username '{}' rebound; closing previous connection",
                username
            );
            // Dropping the old handle closes its channel, which ends that
            // connection's pump task and tears the socket down
            drop(old);
        }
        presence::broadcast_online_users(&relay.registry);
    }

    tracing::info!("Client '{}' connected and registered", username);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, username, connection_id, rx)))
}

pub async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    username: String,
    connection_id: ConnectionId,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    let username_clone = username.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                WsMessage::Text(text) => {
                    let event = match serde_json::from_str::<InboundEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring malformed event from '{}': {}",
                                username_clone,
                                e
                            );
                            continue;
                        }
                    };
                    dispatch(&state_clone, &username_clone, event).await;
                }
                WsMessage::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                WsMessage::Close(_) => {
                    tracing::info!("Client '{}' requested close", username_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task forwarding relay events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(WsMessage::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Unbind and broadcast the new presence set. The unbind is a no-op
    // when this connection was already replaced by a newer one.
    {
        let mut relay = state.relay.lock().await;
        if relay.registry.unbind(&username, connection_id) {
            tracing::info!("Client '{}' disconnected and removed from registry", username);
            presence::broadcast_online_users(&relay.registry);
        }
    }
}

/// Apply one inbound client event to the relay state and fan out the
/// resulting outbound events.
pub async fn dispatch(state: &AppState, username: &str, event: InboundEvent) {
    match event {
        InboundEvent::JoinRoom { target_username } => {
            join_room(state, username, target_username).await;
        }
        InboundEvent::SendMessage {
            content,
            to,
            attachment,
        } => {
            send_message(state, username, content, to, attachment).await;
        }
        InboundEvent::React {
            message_id,
            emoji,
            action,
        } => {
            react(state, username, message_id, emoji, action).await;
        }
        InboundEvent::RequestOnlineUsers => {
            let relay = state.relay.lock().await;
            presence::broadcast_online_users(&relay.registry);
        }
    }
}

async fn join_room(state: &AppState, username: &str, target_username: Option<String>) {
    // An empty target means the public channel, same as an absent one
    let target = target_username.filter(|t| !t.is_empty());

    let mut relay = state.relay.lock().await;

    let room = target.as_deref().map(|t| room_key(username, t));
    relay.registry.set_active_room(username, room.clone());

    let messages = match target.as_deref() {
        Some(t) => relay.store.query_room(username, t),
        None => relay.store.query_public(),
    };

    match &room {
        Some(key) => tracing::info!("Client '{}' joined room '{}'", username, key),
        None => tracing::info!("Client '{}' switched to the public channel", username),
    }

    let payload = serde_json::to_string(&PreviousMessagesEvent::new(messages)).unwrap();
    relay.registry.send_to(username, &payload);
}

async fn send_message(
    state: &AppState,
    username: &str,
    content: String,
    to: Option<String>,
    attachment: Option<Attachment>,
) {
    // Empty-string recipient means public
    let to = to.filter(|t| !t.is_empty());

    let mut relay = state.relay.lock().await;
    // Read the clock under the lock so append order tracks timestamp order
    let timestamp = state.clock.now_millis();
    let message = relay.store.append(
        MessageDraft {
            from: username.to_string(),
            content,
            to,
            attachment,
        },
        timestamp,
    );
    let payload = serde_json::to_string(&MessageEvent::new(message.clone())).unwrap();

    match &message.to {
        Some(recipient) => {
            // Deliver to the recipient and echo to the sender. An offline
            // recipient still gets the message on their next room join.
            if relay.registry.send_to(recipient, &payload) {
                relay.registry.send_to(username, &payload);
                tracing::debug!("Routed private message from '{}' to '{}'", username, recipient);
            } else {
                tracing::debug!(
                    "Recipient '{}' offline; message '{}' stored only",
                    recipient,
                    message.id
                );
            }
        }
        None => {
            relay.registry.broadcast_all(&payload);
            tracing::debug!("Broadcasted public message from '{}'", username);
        }
    }
}

async fn react(
    state: &AppState,
    username: &str,
    message_id: String,
    emoji: String,
    action: ReactionAction,
) {
    let mut relay = state.relay.lock().await;

    match reaction::apply(&mut relay.store, &message_id, &emoji, username, action) {
        ReactionOutcome::Applied(update) => {
            let event = MessageReactionEvent::new(
                update.message_id,
                update.emoji,
                update.username,
                update.action,
            );
            let payload = serde_json::to_string(&event).unwrap();
            match &update.scope {
                DeliveryScope::Public => relay.registry.broadcast_all(&payload),
                DeliveryScope::Room(key) => relay.registry.broadcast_room(key, &payload),
            }
        }
        ReactionOutcome::NoChange => {}
        ReactionOutcome::UnknownMessage => {
            tracing::debug!("Reaction for unknown message '{}' ignored", message_id);
        }
    }
}
