//! Room HTTP Handlers
//!
//! Thin wrappers over `RoomRegistry`; the requester is always the
//! authenticated caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::error::{ApiResponse, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::rooms::RoomRegistry;
use crate::shared::room::{AddMemberRequest, CreateRoomRequest, JoinRoomRequest, UpdateRoomRequest};
use crate::shared::{InviteLink, RoomView, UserSummary};

/// POST /api/rooms (201 Created)
pub async fn create_room(
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, ApiResponse<RoomView>), BackendError> {
    let room = rooms
        .create_room(&request.name, auth.user_id, request.password.as_deref())
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::new(room)))
}

/// GET /api/rooms
pub async fn list_rooms(
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
) -> Result<ApiResponse<Vec<RoomView>>, BackendError> {
    Ok(ApiResponse::new(rooms.list_rooms_for(auth.user_id).await?))
}

/// GET /api/rooms/{id}
pub async fn get_room(
    State(rooms): State<RoomRegistry>,
    Path(room_id): Path<Uuid>,
) -> Result<ApiResponse<RoomView>, BackendError> {
    Ok(ApiResponse::new(rooms.get_room(room_id).await?))
}

/// PUT /api/rooms/{id}
pub async fn update_room(
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    Path(room_id): Path<Uuid>,
    Json(request): Json<UpdateRoomRequest>,
) -> Result<ApiResponse<RoomView>, BackendError> {
    let room = rooms
        .update_room(
            room_id,
            auth.user_id,
            request.name.as_deref(),
            request.password.as_deref(),
        )
        .await?;
    Ok(ApiResponse::new(room))
}

/// DELETE /api/rooms/{id}
pub async fn delete_room(
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    Path(room_id): Path<Uuid>,
) -> Result<ApiResponse<Uuid>, BackendError> {
    rooms.delete_room(room_id, auth.user_id).await?;
    Ok(ApiResponse::new(room_id))
}

/// POST /api/rooms/{id}/invite
pub async fn generate_invite(
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    Path(room_id): Path<Uuid>,
) -> Result<ApiResponse<InviteLink>, BackendError> {
    Ok(ApiResponse::new(rooms.generate_invite(room_id, auth.user_id).await?))
}

/// POST /api/invites/{token}/join
pub async fn join_room(
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    Path(token): Path<String>,
    Json(request): Json<JoinRoomRequest>,
) -> Result<ApiResponse<RoomView>, BackendError> {
    let room = rooms
        .join_room(&token, auth.user_id, request.password.as_deref())
        .await?;
    Ok(ApiResponse::new(room))
}

/// GET /api/rooms/{id}/members
pub async fn list_members(
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    Path(room_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<UserSummary>>, BackendError> {
    Ok(ApiResponse::new(rooms.list_members(room_id, auth.user_id).await?))
}

/// POST /api/rooms/{id}/members
pub async fn add_member(
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    Path(room_id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<ApiResponse<RoomView>, BackendError> {
    let room = rooms.add_member(room_id, auth.user_id, request.user_id).await?;
    Ok(ApiResponse::new(room))
}

/// DELETE /api/rooms/{id}/members/{user_id}
pub async fn remove_member(
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    Path((room_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiResponse<RoomView>, BackendError> {
    let room = rooms.remove_member(room_id, auth.user_id, user_id).await?;
    Ok(ApiResponse::new(room))
}
