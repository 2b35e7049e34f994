//! Route definitions for onboarding wizard sessions and upload previews.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{onboarding, uploads};
use crate::state::AppState;

/// Routes mounted at `/onboarding-sessions`.
///
/// ```text
/// POST   /                                    -> create_session
/// GET    /{id}                                -> get_session
/// PUT    /{id}/step-data                      -> update_step_data
/// POST   /{id}/next                           -> next_step
/// POST   /{id}/back                           -> previous_step
/// POST   /{id}/complete                       -> complete_session
/// POST   /{id}/abandon                        -> abandon_session
/// POST   /{id}/files/{slot}                   -> upload_files (multipart)
/// DELETE /{id}/files/{slot}/{file_id}         -> remove_file
/// PUT    /{id}/files/{slot}/{file_id}/status  -> update_file_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(onboarding::create_session))
        .route("/{id}", get(onboarding::get_session))
        .route("/{id}/step-data", put(onboarding::update_step_data))
        .route("/{id}/next", post(onboarding::next_step))
        .route("/{id}/back", post(onboarding::previous_step))
        .route("/{id}/complete", post(onboarding::complete_session))
        .route("/{id}/abandon", post(onboarding::abandon_session))
        .route("/{id}/files/{slot}", post(onboarding::upload_files))
        .route("/{id}/files/{slot}/{file_id}", delete(onboarding::remove_file))
        .route(
            "/{id}/files/{slot}/{file_id}/status",
            put(onboarding::update_file_status),
        )
}

/// Routes mounted at `/uploads`.
pub fn uploads_router() -> Router<AppState> {
    Router::new().route("/{file_id}/preview", get(uploads::get_preview))
}
