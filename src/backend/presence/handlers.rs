//! Presence HTTP Handlers

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::error::{ApiResponse, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::presence::PresenceTracker;
use crate::shared::{StatusUpdate, UserStatus};

/// Query string of `PATCH /api/users/{id}/status`
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// PATCH /api/users/{id}/status?status=online|offline
///
/// Users may only set their own status. The change is published exactly
/// like a realtime announce or disconnect.
///
/// # Errors
///
/// * `400 Bad Request` - unknown status value
/// * `403 Forbidden` - target is another user
/// * `404 Not Found` - user no longer exists
pub async fn update_status(
    State(presence): State<PresenceTracker>,
    AuthUser(auth): AuthUser,
    Path(user_id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<ApiResponse<StatusUpdate>, BackendError> {
    if user_id != auth.user_id {
        return Err(BackendError::forbidden("You can only update your own status"));
    }

    let status: UserStatus = query.status.trim().parse()?;
    let transition = presence.set_status(user_id, status).await?;
    presence.publish(&transition);

    Ok(ApiResponse::new(StatusUpdate { user_id, status }))
}
