use axum::routing::{get, post};
use axum::Router;

use crate::handlers::stripe;
use crate::state::AppState;

/// Routes mounted at `/stripe`.
///
/// ```text
/// POST   /connect                  -> connect
/// GET    /accounts/{account_id}    -> account_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/connect", post(stripe::connect))
        .route("/accounts/{account_id}", get(stripe::account_status))
}
