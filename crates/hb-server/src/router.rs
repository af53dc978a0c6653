use axum::routing::{get, post};
use axum::Router;
use hb_protocol::endpoints;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Hashbank endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HASH, post(handler::hash_post))
        .route(endpoints::HASH_BY_ID, get(handler::hash_get))
        .route(endpoints::STATS, get(handler::stats_get))
        .route(endpoints::SHUTDOWN, post(handler::shutdown_post))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
