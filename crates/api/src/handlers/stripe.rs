//! Handlers for Stripe Connect onboarding of sellers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use origen_core::error::CoreError;
use origen_core::types::DbId;
use origen_core::validation::{self, FieldErrors};
use origen_payments::ConnectAccountRequest;

use crate::error::{AppError, AppResult};
use crate::handlers::sellers::ensure_seller_exists;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// A seller id sent either as a JSON number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SellerRef {
    Id(DbId),
    Text(String),
}

impl SellerRef {
    fn as_text(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Text(text) => text.trim().to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectBody {
    pub seller_id: Option<SellerRef>,
    pub email: String,
    pub business_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub account_id: String,
    pub onboarding_url: String,
}

fn connect_field_errors(body: &ConnectBody) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let seller_id = body.seller_id.as_ref().map(SellerRef::as_text).unwrap_or_default();
    validation::require_text(&mut errors, "sellerId", &seller_id);
    validation::require_text(&mut errors, "email", &body.email);
    validation::require_text(&mut errors, "businessName", &body.business_name);
    errors
}

// ---------------------------------------------------------------------------
// POST /stripe/connect
// ---------------------------------------------------------------------------

/// Create (or reuse) the seller's connected account and return a fresh
/// onboarding link for it. The account is recorded on the seller and on the
/// seller's wizard session in progress.
pub async fn connect(
    State(state): State<AppState>,
    Json(body): Json<ConnectBody>,
) -> AppResult<impl IntoResponse> {
    connect_field_errors(&body).into_result()?;

    let seller_text = body.seller_id.as_ref().map(SellerRef::as_text).unwrap_or_default();
    let seller_id: DbId = seller_text
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid sellerId '{seller_text}'")))?;
    let seller = ensure_seller_exists(&state, seller_id).await?;

    let account_id = match seller.stripe_account_id {
        Some(existing) => existing,
        None => {
            let request = ConnectAccountRequest {
                seller_id: seller_id.to_string(),
                email: body.email.trim().to_lowercase(),
                business_name: body.business_name.trim().to_string(),
            };
            let account = state.payments.create_connect_account(&request).await?;
            state
                .store
                .set_stripe_account(seller_id, &account.id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::NotFound {
                        entity: "SellerRegistration",
                        id: seller_id.to_string(),
                    })
                })?;
            account.id
        }
    };

    // The wizard's payments step reflects the link immediately.
    if let Some(mut active) = state.store.find_active_session(seller_id).await? {
        if active.session.link_payment_account(Some(&account_id)) {
            state.store.save_session(&active).await?;
        }
    }

    let onboarding_url = state.payments.create_onboarding_link(&account_id).await?;

    tracing::info!(
        seller_id,
        account_id = %account_id,
        processor = state.payments.name(),
        "Stripe onboarding link issued"
    );

    Ok(Json(DataResponse {
        data: ConnectResponse {
            account_id,
            onboarding_url,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /stripe/accounts/{account_id}
// ---------------------------------------------------------------------------

/// Whether a connected account can take charges and receive payouts.
pub async fn account_status(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let status = state.payments.account_status(&account_id).await?;
    Ok(Json(DataResponse { data: status }))
}
