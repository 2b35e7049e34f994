//! Storage for seller registrations and onboarding sessions.
//!
//! Handlers talk to a [`SellerStore`]. [`PgStore`] backs it with Postgres
//! through the `origen-db` repositories; [`MemoryStore`] keeps everything
//! in process for development and tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use origen_core::error::CoreError;
use origen_core::onboarding_wizard::OnboardingSession;
use origen_core::registration::NewSellerRegistration;
use origen_core::seller_status::SellerStatus;
use origen_core::types::{DbId, Timestamp};
use origen_db::models::seller_registration::SellerRegistration;

use crate::error::{AppError, AppResult};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// An onboarding session together with its persistence metadata.
///
/// `version` is the revision the session was loaded at; saves are
/// rejected once another write has moved it on.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub id: DbId,
    pub seller_id: DbId,
    pub session: OnboardingSession,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub(crate) fn session_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "OnboardingSession",
        id: id.to_string(),
    })
}

pub(crate) fn stale_session(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Onboarding session {id} was changed by another request, reload and retry"
    )))
}

pub(crate) fn seller_status_changed(seller_id: DbId, from: SellerStatus) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Seller {seller_id} is no longer '{}'",
        from.as_str()
    )))
}

#[async_trait]
pub trait SellerStore: Send + Sync {
    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;

    async fn is_healthy(&self) -> bool;

    // -- sellers --

    /// Insert a registration in `pending_approval`. A second registration
    /// with the same email is a conflict.
    async fn create_seller(&self, input: &NewSellerRegistration) -> AppResult<SellerRegistration>;

    async fn find_seller(&self, id: DbId) -> AppResult<Option<SellerRegistration>>;

    async fn find_seller_by_email(&self, email: &str) -> AppResult<Option<SellerRegistration>>;

    async fn update_seller_status(
        &self,
        id: DbId,
        status: SellerStatus,
    ) -> AppResult<Option<SellerRegistration>>;

    async fn set_stripe_account(
        &self,
        id: DbId,
        account_id: &str,
    ) -> AppResult<Option<SellerRegistration>>;

    // -- onboarding sessions --

    /// Insert a session. A seller has at most one session in progress.
    async fn create_session(
        &self,
        seller_id: DbId,
        session: &OnboardingSession,
    ) -> AppResult<StoredSession>;

    async fn find_session(&self, id: DbId) -> AppResult<Option<StoredSession>>;

    /// The seller's in-progress session, if any.
    async fn find_active_session(&self, seller_id: DbId) -> AppResult<Option<StoredSession>>;

    /// The seller's most recently completed session, if any.
    async fn find_last_completed_session(
        &self,
        seller_id: DbId,
    ) -> AppResult<Option<StoredSession>>;

    /// Persist the session's step, payloads, status and last error.
    ///
    /// Fails with a conflict when the session was saved since `stored` was
    /// loaded, and with not-found when it no longer exists.
    async fn save_session(&self, stored: &StoredSession) -> AppResult<StoredSession>;

    /// Persist the session and move its seller from `from` to `to` as one
    /// write. Fails with a conflict, writing nothing, when either the
    /// session version or the seller status no longer matches.
    async fn save_session_with_seller_status(
        &self,
        stored: &StoredSession,
        from: SellerStatus,
        to: SellerStatus,
    ) -> AppResult<StoredSession>;
}
