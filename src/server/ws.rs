//! `Subscribe` (§6.1, §4.7): a WebSocket stream of per-subscriber projected
//! state. Grounded on the teacher's `server::demo::stream::stream_demo_game`
//! (resolve a handle, push `Hello`/state messages over a long-lived
//! connection), re-targeted from SSE onto `axum`'s `ws` feature since this
//! crate's subscribers are bidirectional game clients, not a one-way demo.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::SessionToken;
use crate::dispatch::{project, SubscriptionMessage, SubscriptionMode};

use super::routes::ServerContext;

const LOG_TARGET: &str = "server::ws";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsQuery {
    pub room_code: String,
    /// `"table"` or `"player"`; `"player"` requires `auth_token` to resolve
    /// to a seat (§6.2 last sentence).
    #[serde(default = "default_mode")]
    pub mode: String,
    pub auth_token: Option<String>,
}

fn default_mode() -> String {
    "table".to_string()
}

pub async fn subscribe_ws(
    State(ctx): State<Arc<ServerContext>>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx, query))
}

async fn resolve_mode(ctx: &ServerContext, query: &WsQuery) -> Result<SubscriptionMode, String> {
    match query.mode.as_str() {
        "table" => Ok(SubscriptionMode::Table),
        "player" => {
            let raw = query
                .auth_token
                .as_deref()
                .ok_or_else(|| "player mode requires authToken".to_string())?;
            let token: SessionToken = raw.parse().map_err(|_| "malformed authToken".to_string())?;
            let claims = ctx
                .sessions
                .resolve(token)
                .ok_or_else(|| "authToken does not resolve to a session".to_string())?;
            if claims.room_code != query.room_code {
                return Err("authToken was issued for a different room".to_string());
            }
            let seat = claims.seat.ok_or_else(|| "no seat assigned to this token yet".to_string())?;
            Ok(SubscriptionMode::Player { seat })
        }
        other => Err(format!("unknown subscription mode '{other}'")),
    }
}

async fn handle_socket(mut socket: WebSocket, ctx: Arc<ServerContext>, query: WsQuery) {
    let _ = socket
        .send(Message::Text(
            serde_json::to_string(&SubscriptionMessage::Hello { room_code: query.room_code.clone() })
                .unwrap_or_default(),
        ))
        .await;

    let mode = match resolve_mode(&ctx, &query).await {
        Ok(mode) => mode,
        Err(message) => {
            let _ = socket
                .send(Message::Text(
                    serde_json::to_string(&SubscriptionMessage::Error { message }).unwrap_or_default(),
                ))
                .await;
            return;
        }
    };

    let room = match ctx.registry.get_room(&query.room_code) {
        Ok(room) => room,
        Err(err) => {
            let _ = socket
                .send(Message::Text(
                    serde_json::to_string(&SubscriptionMessage::Error { message: err.to_string() })
                        .unwrap_or_default(),
                ))
                .await;
            return;
        }
    };

    let handle = room.game();
    let mut updates = handle.subscribe();
    let snapshot = handle.snapshot();

    let subscribed = SubscriptionMessage::Subscribed {
        mode: mode.label(),
        snapshot: Some(project(&snapshot, mode)),
    };
    if socket
        .send(Message::Text(serde_json::to_string(&subscribed).unwrap_or_default()))
        .await
        .is_err()
    {
        return;
    }

    info!(target: LOG_TARGET, room_code = %query.room_code, mode = mode.label(), "subscriber attached");

    loop {
        tokio::select! {
            recv = updates.recv() => {
                match recv {
                    Ok(state) => {
                        let message = SubscriptionMessage::GameState {
                            state: project(&state, mode),
                            revision: state.revision,
                            reason: "update",
                        };
                        if socket
                            .send(Message::Text(serde_json::to_string(&message).unwrap_or_default()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(target: LOG_TARGET, skipped, "subscriber lagged behind game updates");
                        let snapshot = handle.snapshot();
                        let message = SubscriptionMessage::GameState {
                            state: project(&snapshot, mode),
                            revision: snapshot.revision,
                            reason: "resync",
                        };
                        if socket
                            .send(Message::Text(serde_json::to_string(&message).unwrap_or_default()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    info!(target: LOG_TARGET, room_code = %query.room_code, "subscriber detached");
}
