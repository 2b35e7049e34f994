//! Route definitions for sellers and the seller status table.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sellers;
use crate::state::AppState;

/// Routes mounted at `/sellers`.
///
/// ```text
/// POST   /register       -> register
/// GET    /{id}           -> get_seller
/// GET    /{id}/status    -> get_status
/// PUT    /{id}/status    -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(sellers::register))
        .route("/{id}", get(sellers::get_seller))
        .route(
            "/{id}/status",
            get(sellers::get_status).put(sellers::update_status),
        )
}

/// Routes mounted at `/seller-statuses`.
pub fn statuses_router() -> Router<AppState> {
    Router::new().route("/", get(sellers::list_statuses))
}
