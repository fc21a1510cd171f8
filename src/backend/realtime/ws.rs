/**
 * WebSocket Transport
 *
 * `GET /ws` upgrades to a WebSocket carrying JSON text frames of the form
 * `{"event": "<name>", "data": <payload>}`.
 *
 * # Authentication
 *
 * The bearer token is read from the `Authorization` header or, for browser
 * clients that cannot set headers on an upgrade, from `?token=`. An invalid
 * token rejects the upgrade with 401.
 *
 * # Connection Loop
 *
 * One task per connection selects over inbound frames and the session's
 * outbound queue. Inbound frames are handled one at a time, in order.
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::backend::error::BackendError;
use crate::backend::middleware::{authenticate, bearer_token, AuthenticatedUser};
use crate::backend::realtime::gateway::Gateway;
use crate::backend::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// GET /ws
///
/// # Errors
///
/// * `401 Unauthorized` - token missing, invalid, or for a deleted user
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WsQuery>,
) -> Result<Response, BackendError> {
    let token = bearer_token(&headers)
        .map(str::to_string)
        .or(query.token)
        .ok_or_else(|| {
            tracing::warn!("[Realtime] Upgrade without token");
            BackendError::unauthenticated("Missing bearer token")
        })?;

    let user = authenticate(&app_state, &token).await?;
    let gateway = app_state.gateway.clone();

    tracing::info!("[Realtime] Upgrading connection for {}", user.username);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, gateway, user)))
}

async fn handle_socket(socket: WebSocket, gateway: Gateway, user: AuthenticatedUser) {
    let (mut session, mut outbound) = gateway.connect(user.user_id);
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        gateway.handle_frame(&mut session, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::warn!("[Realtime] Socket error on session {}: {}", session.id, e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            event = outbound.recv() => {
                let Some(event) = event else { break };
                let text = match event.to_json() {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!("[Realtime] Failed to encode frame: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    gateway.disconnect(session).await;
}
