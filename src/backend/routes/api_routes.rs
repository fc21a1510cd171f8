/**
 * API Routes
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/login` - User login
 *
 * ## Authenticated (bearer token)
 * - `GET /api/auth/me` - Current user
 * - `PUT /api/users/me` - Edit own profile
 * - `GET /api/users/search?query=&limit=&page=` - Find users by name
 * - `GET /api/users/{id}` - Profile with following and followers
 * - `POST|DELETE /api/users/{id}/follow` - Follow graph
 * - `PATCH /api/users/{id}/status?status=online|offline` - Own presence
 * - `POST|GET /api/rooms` - Create room, list own rooms
 * - `GET|PUT|DELETE /api/rooms/{id}` - Room record
 * - `POST /api/rooms/{id}/invite` - Mint invite token
 * - `POST /api/invites/{token}/join` - Join through invite
 * - `GET|POST /api/rooms/{id}/members` - Membership
 * - `DELETE /api/rooms/{id}/members/{user_id}` - Remove member
 * - `GET /api/messengers` - Own direct conversations
 * - `GET /api/messengers/{room_id}` - Room history
 * - `POST /api/messengers/{room_id}/messages` - Post and broadcast
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};

use crate::backend::auth::{
    follow_user, get_me, get_user, login, search_users, signup, unfollow_user, update_me,
};
use crate::backend::messaging::handlers as messaging;
use crate::backend::middleware::auth_middleware;
use crate::backend::presence::handlers::update_status;
use crate::backend::rooms::handlers as rooms;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Everything except signup and login goes through `auth_middleware`.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login));

    let protected = Router::new()
        .route("/api/auth/me", get(get_me))
        // Users and follow graph
        .route("/api/users/me", put(update_me))
        .route("/api/users/search", get(search_users))
        .route("/api/users/{id}", get(get_user))
        .route("/api/users/{id}/follow", post(follow_user).delete(unfollow_user))
        .route("/api/users/{id}/status", patch(update_status))
        // Rooms
        .route("/api/rooms", post(rooms::create_room).get(rooms::list_rooms))
        .route(
            "/api/rooms/{id}",
            get(rooms::get_room)
                .put(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .route("/api/rooms/{id}/invite", post(rooms::generate_invite))
        .route("/api/invites/{token}/join", post(rooms::join_room))
        .route(
            "/api/rooms/{id}/members",
            get(rooms::list_members).post(rooms::add_member),
        )
        .route(
            "/api/rooms/{id}/members/{user_id}",
            axum::routing::delete(rooms::remove_member),
        )
        // Messages
        .route("/api/messengers", get(messaging::list_conversations))
        .route("/api/messengers/{room_id}", get(messaging::get_history))
        .route("/api/messengers/{room_id}/messages", post(messaging::post_message))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    router.merge(public).merge(protected)
}
