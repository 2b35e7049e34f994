//! Serves preview bytes of uploaded images.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use uuid::Uuid;

use origen_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /uploads/{file_id}/preview
pub async fn get_preview(
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let preview = state.previews.get(file_id).await.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Preview",
            id: file_id.to_string(),
        })
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, preview.content_type),
            (header::CACHE_CONTROL, "private, max-age=3600".to_string()),
        ],
        preview.bytes,
    ))
}
