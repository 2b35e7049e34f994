//! Handlers for seller registration and seller status.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use origen_core::error::CoreError;
use origen_core::registration::{self, RegistrationForm};
use origen_core::seller_status::{SellerStatus, StatusView};
use origen_core::types::DbId;
use origen_db::models::seller_registration::SellerRegistration;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateSellerStatus {
    pub status: SellerStatus,
}

/// Status view of one seller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerStatusResponse {
    pub seller_id: DbId,
    #[serde(flatten)]
    pub view: StatusView,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a seller, mapping absence to 404.
pub(crate) async fn ensure_seller_exists(
    state: &AppState,
    id: DbId,
) -> AppResult<SellerRegistration> {
    state.store.find_seller(id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "SellerRegistration",
            id: id.to_string(),
        })
    })
}

fn status_response(seller: &SellerRegistration) -> AppResult<SellerStatusResponse> {
    Ok(SellerStatusResponse {
        seller_id: seller.id,
        view: seller.seller_status()?.view(),
    })
}

// ---------------------------------------------------------------------------
// POST /sellers/register
// ---------------------------------------------------------------------------

/// Register a new seller. The record starts in `pending_approval`.
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegistrationForm>,
) -> AppResult<impl IntoResponse> {
    let input = registration::validate_registration(&form)?;

    if state.store.find_seller_by_email(&input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A seller with email '{}' is already registered",
            input.email
        ))));
    }

    let seller = state.store.create_seller(&input).await?;

    tracing::info!(
        seller_id = seller.id,
        category = input.producer_category.slug(),
        province = %seller.province,
        "Seller registration received"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: seller })))
}

// ---------------------------------------------------------------------------
// GET /sellers/{id}
// ---------------------------------------------------------------------------

pub async fn get_seller(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let seller = ensure_seller_exists(&state, id).await?;
    Ok(Json(DataResponse { data: seller }))
}

// ---------------------------------------------------------------------------
// GET /sellers/{id}/status
// ---------------------------------------------------------------------------

/// Current status with capabilities, message, next action and banner.
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let seller = ensure_seller_exists(&state, id).await?;
    Ok(Json(DataResponse {
        data: status_response(&seller)?,
    }))
}

// ---------------------------------------------------------------------------
// PUT /sellers/{id}/status
// ---------------------------------------------------------------------------

/// Move a seller along the account lifecycle.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateSellerStatus>,
) -> AppResult<impl IntoResponse> {
    let seller = ensure_seller_exists(&state, id).await?;
    let current = seller.seller_status()?;
    current.ensure_transition(body.status)?;

    let updated = state
        .store
        .update_seller_status(id, body.status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "SellerRegistration",
                id: id.to_string(),
            })
        })?;

    tracing::info!(
        seller_id = id,
        from = current.as_str(),
        to = body.status.as_str(),
        "Seller status changed"
    );

    Ok(Json(DataResponse {
        data: status_response(&updated)?,
    }))
}

// ---------------------------------------------------------------------------
// GET /seller-statuses
// ---------------------------------------------------------------------------

/// The full status table, one view per status.
pub async fn list_statuses() -> Json<DataResponse<Vec<StatusView>>> {
    Json(DataResponse {
        data: SellerStatus::ALL.into_iter().map(SellerStatus::view).collect(),
    })
}
