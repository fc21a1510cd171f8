//! Messaging HTTP Handlers
//!
//! HTTP access to the message store. Posting over HTTP fans the message out
//! to realtime sessions joined to the room, exactly like `send-message`.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::backend::error::{ApiResponse, BackendError};
use crate::backend::messaging::MessageStore;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::BroadcastHub;
use crate::shared::message::PostMessageRequest;
use crate::shared::{ConversationSummary, MessageView, ReceivedMessage, ServerEvent};

/// GET /api/messengers
///
/// Direct conversations the caller takes part in.
pub async fn list_conversations(
    State(messages): State<MessageStore>,
    AuthUser(auth): AuthUser,
) -> Result<ApiResponse<Vec<ConversationSummary>>, BackendError> {
    Ok(ApiResponse::new(messages.list_conversations_for(auth.user_id).await?))
}

/// GET /api/messengers/{room_id}
pub async fn get_history(
    State(messages): State<MessageStore>,
    Path(room_id): Path<String>,
) -> Result<ApiResponse<Vec<MessageView>>, BackendError> {
    Ok(ApiResponse::new(messages.get_history(&room_id).await?))
}

/// POST /api/messengers/{room_id}/messages
///
/// The caller is the sender. Sessions joined to the room receive a
/// `receive-message` frame.
pub async fn post_message(
    State(messages): State<MessageStore>,
    State(hub): State<BroadcastHub>,
    AuthUser(auth): AuthUser,
    Path(room_id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> Result<ApiResponse<MessageView>, BackendError> {
    let message = messages
        .append_message(&room_id, Some(auth.user_id), request.message.as_deref())
        .await?;

    let reached = hub.broadcast(
        &message.room_id,
        ServerEvent::ReceiveMessage(ReceivedMessage::from(&message)),
    );
    tracing::debug!("[Messages] HTTP message in {} reached {} sessions", message.room_id, reached);

    Ok(ApiResponse::new(message))
}
