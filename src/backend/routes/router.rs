/**
 * Router Configuration
 *
 * Combines the API routes and the realtime endpoint into one router.
 *
 * # Route Order
 *
 * 1. `GET /ws` - WebSocket upgrade; authenticates itself so browsers can
 *    pass the token as `?token=`
 * 2. API routes under `/api`
 * 3. Fallback handler (404)
 *
 * Every request is traced by `TraceLayer`; CORS is permissive.
 */

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::realtime::ws_handler;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/ws", get(ws_handler));

    let router = configure_api_routes(router, &app_state);

    let router = router.fallback(|| async { BackendError::not_found("Route not found") });

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
