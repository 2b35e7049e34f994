//! Handlers for the seller onboarding wizard.
//!
//! Every mutating endpoint loads the session, applies one state-machine
//! operation from `origen_core::onboarding_wizard` and saves it back at the
//! version it was loaded at, so a concurrent write turns into a 409 instead
//! of being lost. The response is always the session snapshot, so the form
//! never derives navigation or progress on its own.
//!
//! The payment account link in the payments step mirrors the seller record
//! (set by `POST /stripe/connect`), never the submitted form.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use origen_core::error::CoreError;
use origen_core::onboarding_wizard::{FileSlot, OnboardingSession, StepPayload, WizardSnapshot};
use origen_core::seller_status::SellerStatus;
use origen_core::types::{DbId, Timestamp};
use origen_core::uploads::{FileCandidate, RejectedFile, UploadStatus, UploadedFile};
use origen_db::models::seller_registration::SellerRegistration;

use crate::error::{AppError, AppResult};
use crate::handlers::sellers::ensure_seller_exists;
use crate::previews::PreviewCache;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::store::{session_not_found, StoredSession};

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionBody {
    pub seller_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFileStatus {
    pub status: UploadStatus,
}

/// A stored session as the wizard shell sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: DbId,
    pub seller_id: DbId,
    #[serde(flatten)]
    pub wizard: WizardSnapshot,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&StoredSession> for SessionView {
    fn from(stored: &StoredSession) -> Self {
        Self {
            id: stored.id,
            seller_id: stored.seller_id,
            wizard: stored.session.snapshot(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub accepted: Vec<UploadedFile>,
    pub rejected: Vec<RejectedFile>,
    pub session: SessionView,
}

type SessionResponse = Json<DataResponse<SessionView>>;

fn session_response(stored: &StoredSession) -> SessionResponse {
    Json(DataResponse {
        data: SessionView::from(stored),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_session_exists(state: &AppState, id: DbId) -> AppResult<StoredSession> {
    let mut stored = state
        .store
        .find_session(id)
        .await?
        .ok_or_else(|| session_not_found(id))?;
    drop_missing_previews(state, &mut stored).await;
    Ok(stored)
}

/// Clear `previewUrl` on files whose preview bytes are no longer held,
/// e.g. after a restart.
async fn drop_missing_previews(state: &AppState, stored: &mut StoredSession) {
    let with_preview: Vec<Uuid> = stored
        .session
        .data()
        .all_files()
        .into_iter()
        .filter(|file| file.preview_url.is_some())
        .map(|file| file.id)
        .collect();
    if with_preview.is_empty() {
        return;
    }
    let held = state.previews.held(with_preview).await;
    stored.session.drop_preview_urls(|id| held.contains(&id));
}

async fn persist(state: &AppState, stored: &StoredSession) -> AppResult<StoredSession> {
    state.store.save_session(stored).await
}

/// Bring the session's payment link in line with the seller record.
async fn sync_payment_account(
    state: &AppState,
    stored: &mut StoredSession,
) -> AppResult<SellerRegistration> {
    let seller = ensure_seller_exists(state, stored.seller_id).await?;
    stored
        .session
        .link_payment_account(seller.stripe_account_id.as_deref());
    Ok(seller)
}

/// Release every preview of a closed session and clear its references.
async fn release_previews(state: &AppState, session: &mut OnboardingSession) {
    for file in session.data().all_files() {
        state.previews.release(file.id).await;
    }
    session.drop_preview_urls(|_| false);
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions
// ---------------------------------------------------------------------------

/// Start the wizard for a seller, or return the session already in
/// progress.
///
/// Starting requires `approved_access` (moved to `onboarding_in_progress`)
/// or `onboarding_in_progress` (a seller sent back from verification, whose
/// new session starts from the payloads of the last completed one).
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionBody>,
) -> AppResult<impl IntoResponse> {
    let seller = ensure_seller_exists(&state, body.seller_id).await?;

    if let Some(mut existing) = state.store.find_active_session(seller.id).await? {
        drop_missing_previews(&state, &mut existing).await;
        existing
            .session
            .link_payment_account(seller.stripe_account_id.as_deref());
        return Ok((StatusCode::OK, session_response(&existing)));
    }

    let status = seller.seller_status()?;
    match status {
        SellerStatus::ApprovedAccess | SellerStatus::OnboardingInProgress => {}
        other => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Seller status '{}' does not allow onboarding",
                other.as_str()
            ))));
        }
    }

    let previous = state.store.find_last_completed_session(seller.id).await?;
    let mut session = match &previous {
        Some(previous) => {
            let mut session = OnboardingSession::resume_from(previous.session.data().clone());
            session.drop_preview_urls(|_| false);
            session
        }
        None => OnboardingSession::new(),
    };
    session.link_payment_account(seller.stripe_account_id.as_deref());

    if status == SellerStatus::ApprovedAccess {
        state
            .store
            .update_seller_status(seller.id, SellerStatus::OnboardingInProgress)
            .await?;
    }

    let stored = state.store.create_session(seller.id, &session).await?;

    tracing::info!(
        session_id = stored.id,
        seller_id = seller.id,
        resumed_from = previous.as_ref().map(|p| p.id),
        "Onboarding session created"
    );

    Ok((StatusCode::CREATED, session_response(&stored)))
}

// ---------------------------------------------------------------------------
// GET /onboarding-sessions/{id}
// ---------------------------------------------------------------------------

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<SessionResponse> {
    let mut stored = ensure_session_exists(&state, id).await?;
    sync_payment_account(&state, &mut stored).await?;
    Ok(session_response(&stored))
}

// ---------------------------------------------------------------------------
// PUT /onboarding-sessions/{id}/step-data
// ---------------------------------------------------------------------------

/// Replace the payload of the current step.
pub async fn update_step_data(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(payload): Json<StepPayload>,
) -> AppResult<SessionResponse> {
    let mut stored = ensure_session_exists(&state, id).await?;
    sync_payment_account(&state, &mut stored).await?;
    let step = payload.step();
    stored.session.update_step(payload)?;
    let saved = persist(&state, &stored).await?;

    tracing::debug!(session_id = id, step = step.title(), "Onboarding step data updated");

    Ok(session_response(&saved))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/next
// ---------------------------------------------------------------------------

/// Advance to the next step. Rejected with field errors while the current
/// step is invalid.
pub async fn next_step(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<SessionResponse> {
    let mut stored = ensure_session_exists(&state, id).await?;
    let from = stored.session.current_step();
    let to = stored.session.next()?;
    let saved = persist(&state, &stored).await?;

    tracing::info!(
        session_id = id,
        from_step = from.index(),
        to_step = to.index(),
        "Onboarding session advanced"
    );

    Ok(session_response(&saved))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/back
// ---------------------------------------------------------------------------

pub async fn previous_step(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<SessionResponse> {
    let mut stored = ensure_session_exists(&state, id).await?;
    let from = stored.session.current_step();
    let to = stored.session.back()?;
    let saved = persist(&state, &stored).await?;

    tracing::info!(
        session_id = id,
        from_step = from.index(),
        to_step = to.index(),
        "Onboarding session went back"
    );

    Ok(session_response(&saved))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/complete
// ---------------------------------------------------------------------------

/// Submit the finished wizard.
///
/// The payments step counts as connected only when the seller record holds
/// a connected account. On success the session and the seller's move to
/// `pending_verification` are saved together. On failure the session stays
/// on the last step with the error recorded as `lastError`, and the
/// failure is returned to the caller.
pub async fn complete_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<SessionResponse> {
    let mut stored = ensure_session_exists(&state, id).await?;
    let seller = sync_payment_account(&state, &mut stored).await?;
    stored.session.begin_submit()?;

    let current = seller.seller_status()?;
    if let Err(err) = current.ensure_transition(SellerStatus::PendingVerification) {
        let err = AppError::from(err);
        stored.session.finish_submit(Err(err.to_string()))?;
        persist(&state, &stored).await?;
        tracing::warn!(session_id = id, error = %err, "Onboarding submit failed");
        return Err(err);
    }

    stored.session.finish_submit(Ok(()))?;
    let mut saved = state
        .store
        .save_session_with_seller_status(&stored, current, SellerStatus::PendingVerification)
        .await?;
    release_previews(&state, &mut saved.session).await;

    tracing::info!(
        session_id = id,
        seller_id = stored.seller_id,
        "Onboarding session completed"
    );

    Ok(session_response(&saved))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/abandon
// ---------------------------------------------------------------------------

/// Discard an in-progress session and release its previews.
pub async fn abandon_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<SessionResponse> {
    let mut stored = ensure_session_exists(&state, id).await?;
    stored.session.abandon()?;
    let mut saved = persist(&state, &stored).await?;
    release_previews(&state, &mut saved.session).await;

    tracing::info!(session_id = id, "Onboarding session abandoned");

    Ok(session_response(&saved))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/files/{slot}
// ---------------------------------------------------------------------------

/// Offer multipart files to a file field of the current step.
///
/// Every part with a file name is a candidate. Accepted images get a
/// preview; excluded files are listed with the reason.
pub async fn upload_files(
    State(state): State<AppState>,
    Path((id, slot)): Path<(DbId, FileSlot)>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<UploadResponse>>> {
    let mut stored = ensure_session_exists(&state, id).await?;

    let mut candidates: Vec<FileCandidate> = Vec::new();
    let mut contents: Vec<Bytes> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        candidates.push(FileCandidate {
            name,
            size: bytes.len() as u64,
            mime_type,
        });
        contents.push(bytes);
    }

    if candidates.is_empty() {
        return Err(AppError::BadRequest(
            "Upload contains no files".to_string(),
        ));
    }

    let outcome = stored
        .session
        .add_files(slot, candidates, |file| PreviewCache::url_for(file.id))?;

    // Previews go in before the save so no reader sees the file without one.
    for (file, &index) in outcome.accepted.iter().zip(&outcome.accepted_indices) {
        if file.is_image() {
            state
                .previews
                .insert(file.id, file.mime_type.clone(), contents[index].clone())
                .await;
        }
    }
    let saved = match persist(&state, &stored).await {
        Ok(saved) => saved,
        Err(err) => {
            for file in &outcome.accepted {
                state.previews.release(file.id).await;
            }
            return Err(err);
        }
    };
    for file in &outcome.replaced {
        state.previews.release(file.id).await;
    }

    tracing::info!(
        session_id = id,
        slot = ?slot,
        accepted = outcome.accepted.len(),
        rejected = outcome.rejected.len(),
        "Onboarding files uploaded"
    );

    Ok(Json(DataResponse {
        data: UploadResponse {
            accepted: outcome.accepted,
            rejected: outcome.rejected,
            session: SessionView::from(&saved),
        },
    }))
}

// ---------------------------------------------------------------------------
// DELETE /onboarding-sessions/{id}/files/{slot}/{file_id}
// ---------------------------------------------------------------------------

pub async fn remove_file(
    State(state): State<AppState>,
    Path((id, slot, file_id)): Path<(DbId, FileSlot, Uuid)>,
) -> AppResult<SessionResponse> {
    let mut stored = ensure_session_exists(&state, id).await?;
    let removed = stored.session.remove_file(slot, file_id)?;
    let saved = persist(&state, &stored).await?;
    state.previews.release(removed.id).await;

    tracing::info!(session_id = id, file_id = %file_id, "Onboarding file removed");

    Ok(session_response(&saved))
}

// ---------------------------------------------------------------------------
// PUT /onboarding-sessions/{id}/files/{slot}/{file_id}/status
// ---------------------------------------------------------------------------

/// Record an upload or verification result for a file.
pub async fn update_file_status(
    State(state): State<AppState>,
    Path((id, slot, file_id)): Path<(DbId, FileSlot, Uuid)>,
    Json(body): Json<UpdateFileStatus>,
) -> AppResult<impl IntoResponse> {
    let mut stored = ensure_session_exists(&state, id).await?;
    let file = stored.session.set_file_status(slot, file_id, body.status)?;
    persist(&state, &stored).await?;

    tracing::info!(
        session_id = id,
        file_id = %file_id,
        status = ?body.status,
        "Onboarding file status updated"
    );

    Ok(Json(DataResponse { data: file }))
}
