use axum::{Router, middleware, routing::get};

use super::handlers::health::{health, not_found};
use super::middleware::session::session_middleware;
use crate::presentation::AppState;

pub(crate) mod auth;
pub(crate) mod posts;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .merge(posts::router())
        .merge(auth::router())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state)
}
