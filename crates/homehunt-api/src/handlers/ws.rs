//! WebSocket upgrade handler.
//!
//! A channel is opened as soon as the socket is upgraded and is only
//! registered under a user once the client sends `authenticate`, which
//! also records the user so notifications addressed to them can be
//! stored. The channel guard lives as long as the socket task, so every exit path
//! (close frame, transport error, eviction, shutdown) unregisters it.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use homehunt_core::types::UserId;
use homehunt_realtime::connection::ChannelGuard;
use homehunt_realtime::message::{InboundMessage, OutboundMessage};

use crate::extractors::auth::identity_from_headers;
use crate::state::AppState;

/// GET /ws
pub async fn ws_upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    // Present when the upgrade came through the identity proxy.
    let proxied_user = identity_from_headers(&headers).ok().map(|(id, _)| id);
    ws.on_upgrade(move |socket| handle_socket(state, socket, proxied_user))
}

async fn handle_socket(state: AppState, socket: WebSocket, proxied_user: Option<UserId>) {
    let (guard, mut outbound_rx) = state.realtime.registry.open_channel();
    let handle = guard.handle().clone();
    let conn_id = guard.id();
    let (mut ws_tx, mut ws_rx) = socket.split();

    let period = Duration::from_secs(state.config.realtime.ping_interval_seconds.max(1));
    let mut ping = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

    debug!(conn_id = %conn_id, "WebSocket channel opened");

    loop {
        tokio::select! {
            _ = handle.closed() => {
                debug!(conn_id = %conn_id, "Channel closed by registry");
                break;
            }
            outbound = outbound_rx.recv() => {
                let Some(text) = outbound else { break };
                if ws_tx.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            _ = ping.tick() => {
                if ws_tx.send(Message::Ping(Default::default())).await.is_err() {
                    break;
                }
            }
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    handle_inbound(&state, &guard, proxied_user, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
        }
    }

    let _ = ws_tx.close().await;
    info!(
        conn_id = %conn_id,
        user_id = ?guard.user_id(),
        "WebSocket connection closed"
    );
    // Dropping the guard unregisters the channel.
    drop(guard);
}

async fn handle_inbound(
    state: &AppState,
    guard: &ChannelGuard,
    proxied_user: Option<UserId>,
    text: &str,
) {
    state.realtime.metrics.message_received();

    match serde_json::from_str::<InboundMessage>(text) {
        Ok(InboundMessage::Authenticate { user_id }) => {
            if proxied_user.is_some_and(|proxied| proxied != user_id) {
                warn!(
                    conn_id = %guard.id(),
                    claimed = %user_id,
                    proxied = ?proxied_user,
                    "authenticate userId differs from proxy identity"
                );
            }
            // Notification rows reference users, so a socket-only user must exist first.
            if let Err(e) = state.user_service.ensure_user(user_id, None).await {
                warn!(
                    conn_id = %guard.id(),
                    user_id = %user_id,
                    error = %e,
                    "Failed to record user, ignoring authenticate"
                );
                return;
            }
            guard.authenticate(user_id);
            info!(conn_id = %guard.id(), user_id = %user_id, "WebSocket channel authenticated");
            reply(guard, &OutboundMessage::Authenticated { user_id });
        }
        Ok(InboundMessage::Ping) => reply(guard, &OutboundMessage::Pong),
        Err(e) => {
            debug!(conn_id = %guard.id(), error = %e, "Ignoring unrecognized message");
        }
    }
}

fn reply(guard: &ChannelGuard, message: &OutboundMessage) {
    match serde_json::to_string(message) {
        Ok(text) => {
            guard.handle().try_send(text);
        }
        Err(e) => warn!(error = %e, "Failed to serialize reply"),
    }
}
