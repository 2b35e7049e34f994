//! Postgres-backed [`SellerStore`].

use async_trait::async_trait;
use origen_core::onboarding_wizard::OnboardingSession;
use origen_core::registration::NewSellerRegistration;
use origen_core::seller_status::SellerStatus;
use origen_core::types::DbId;
use origen_db::models::onboarding_session::{OnboardingSessionRow, SessionColumns};
use origen_db::models::seller_registration::SellerRegistration;
use origen_db::repositories::{OnboardingSessionRepo, SellerRegistrationRepo, SubmitOutcome};
use origen_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::store::{
    seller_status_changed, session_not_found, stale_session, SellerStore, StoredSession,
};

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Explain a save that matched no row: the session is either gone or
    /// was saved by someone else.
    async fn missed_save(&self, id: DbId) -> AppError {
        match OnboardingSessionRepo::find_by_id(&self.pool, id).await {
            Ok(Some(_)) => stale_session(id),
            Ok(None) => session_not_found(id),
            Err(err) => err.into(),
        }
    }
}

fn to_stored(row: OnboardingSessionRow) -> AppResult<StoredSession> {
    Ok(StoredSession {
        session: row.to_session()?,
        id: row.id,
        seller_id: row.seller_id,
        version: row.version,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl SellerStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn is_healthy(&self) -> bool {
        origen_db::health_check(&self.pool).await.is_ok()
    }

    async fn create_seller(&self, input: &NewSellerRegistration) -> AppResult<SellerRegistration> {
        Ok(SellerRegistrationRepo::create(&self.pool, input).await?)
    }

    async fn find_seller(&self, id: DbId) -> AppResult<Option<SellerRegistration>> {
        Ok(SellerRegistrationRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_seller_by_email(&self, email: &str) -> AppResult<Option<SellerRegistration>> {
        Ok(SellerRegistrationRepo::find_by_email(&self.pool, email).await?)
    }

    async fn update_seller_status(
        &self,
        id: DbId,
        status: SellerStatus,
    ) -> AppResult<Option<SellerRegistration>> {
        Ok(SellerRegistrationRepo::update_status(&self.pool, id, status.as_str()).await?)
    }

    async fn set_stripe_account(
        &self,
        id: DbId,
        account_id: &str,
    ) -> AppResult<Option<SellerRegistration>> {
        Ok(SellerRegistrationRepo::set_stripe_account(&self.pool, id, account_id).await?)
    }

    async fn create_session(
        &self,
        seller_id: DbId,
        session: &OnboardingSession,
    ) -> AppResult<StoredSession> {
        let columns = SessionColumns::from_session(session)?;
        let row = OnboardingSessionRepo::create(&self.pool, seller_id, &columns).await?;
        to_stored(row)
    }

    async fn find_session(&self, id: DbId) -> AppResult<Option<StoredSession>> {
        OnboardingSessionRepo::find_by_id(&self.pool, id)
            .await?
            .map(to_stored)
            .transpose()
    }

    async fn find_active_session(&self, seller_id: DbId) -> AppResult<Option<StoredSession>> {
        OnboardingSessionRepo::find_active_by_seller(&self.pool, seller_id)
            .await?
            .map(to_stored)
            .transpose()
    }

    async fn find_last_completed_session(
        &self,
        seller_id: DbId,
    ) -> AppResult<Option<StoredSession>> {
        OnboardingSessionRepo::find_last_completed_by_seller(&self.pool, seller_id)
            .await?
            .map(to_stored)
            .transpose()
    }

    async fn save_session(&self, stored: &StoredSession) -> AppResult<StoredSession> {
        let columns = SessionColumns::from_session(&stored.session)?;
        match OnboardingSessionRepo::save(&self.pool, stored.id, stored.version, &columns).await? {
            Some(row) => to_stored(row),
            None => Err(self.missed_save(stored.id).await),
        }
    }

    async fn save_session_with_seller_status(
        &self,
        stored: &StoredSession,
        from: SellerStatus,
        to: SellerStatus,
    ) -> AppResult<StoredSession> {
        let columns = SessionColumns::from_session(&stored.session)?;
        let outcome = OnboardingSessionRepo::save_with_seller_status(
            &self.pool,
            stored.id,
            stored.version,
            &columns,
            from.as_str(),
            to.as_str(),
        )
        .await?;
        match outcome {
            SubmitOutcome::Saved(row) => to_stored(row),
            SubmitOutcome::StaleSession => Err(self.missed_save(stored.id).await),
            SubmitOutcome::SellerStatusChanged => Err(seller_status_changed(stored.seller_id, from)),
        }
    }
}
