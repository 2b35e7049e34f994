//! In-process [`SellerStore`] used when no database is configured and by
//! the integration tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use origen_core::error::CoreError;
use origen_core::onboarding_wizard::{OnboardingSession, OnboardingStatus};
use origen_core::registration::NewSellerRegistration;
use origen_core::seller_status::SellerStatus;
use origen_core::types::DbId;
use origen_db::models::seller_registration::SellerRegistration;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::store::{
    seller_status_changed, session_not_found, stale_session, SellerStore, StoredSession,
};

#[derive(Debug, Default)]
struct Tables {
    sellers: BTreeMap<DbId, SellerRegistration>,
    sessions: BTreeMap<DbId, StoredSession>,
    next_seller_id: DbId,
    next_session_id: DbId,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_active(stored: &StoredSession) -> bool {
    stored.session.status() == OnboardingStatus::InProgress
}

impl Tables {
    /// Overwrite a stored session if it is still at the caller's version.
    fn save_session(&mut self, stored: &StoredSession) -> AppResult<StoredSession> {
        let current = self
            .sessions
            .get_mut(&stored.id)
            .ok_or_else(|| session_not_found(stored.id))?;
        if current.version != stored.version {
            return Err(stale_session(stored.id));
        }
        current.session = stored.session.clone();
        current.version += 1;
        current.updated_at = Utc::now();
        Ok(current.clone())
    }
}

#[async_trait]
impl SellerStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn is_healthy(&self) -> bool {
        true
    }

    async fn create_seller(&self, input: &NewSellerRegistration) -> AppResult<SellerRegistration> {
        let mut tables = self.tables.write().await;
        if tables.sellers.values().any(|s| s.email == input.email) {
            return Err(CoreError::Conflict(format!(
                "A seller with email '{}' is already registered",
                input.email
            ))
            .into());
        }

        tables.next_seller_id += 1;
        let now = Utc::now();
        let seller = SellerRegistration {
            id: tables.next_seller_id,
            contact_name: input.contact_name.clone(),
            contact_surname: input.contact_surname.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            business_name: input.business_name.clone(),
            business_type: input.business_type.clone(),
            province: input.province.clone(),
            city: input.city.clone(),
            producer_category: input.producer_category.slug().to_string(),
            why_origin: input.why_origin.clone(),
            status: SellerStatus::PendingApproval.as_str().to_string(),
            stripe_account_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.sellers.insert(seller.id, seller.clone());
        Ok(seller)
    }

    async fn find_seller(&self, id: DbId) -> AppResult<Option<SellerRegistration>> {
        Ok(self.tables.read().await.sellers.get(&id).cloned())
    }

    async fn find_seller_by_email(&self, email: &str) -> AppResult<Option<SellerRegistration>> {
        Ok(self
            .tables
            .read()
            .await
            .sellers
            .values()
            .find(|s| s.email == email)
            .cloned())
    }

    async fn update_seller_status(
        &self,
        id: DbId,
        status: SellerStatus,
    ) -> AppResult<Option<SellerRegistration>> {
        let mut tables = self.tables.write().await;
        Ok(tables.sellers.get_mut(&id).map(|seller| {
            seller.status = status.as_str().to_string();
            seller.updated_at = Utc::now();
            seller.clone()
        }))
    }

    async fn set_stripe_account(
        &self,
        id: DbId,
        account_id: &str,
    ) -> AppResult<Option<SellerRegistration>> {
        let mut tables = self.tables.write().await;
        Ok(tables.sellers.get_mut(&id).map(|seller| {
            seller.stripe_account_id = Some(account_id.to_string());
            seller.updated_at = Utc::now();
            seller.clone()
        }))
    }

    async fn create_session(
        &self,
        seller_id: DbId,
        session: &OnboardingSession,
    ) -> AppResult<StoredSession> {
        let mut tables = self.tables.write().await;
        if !tables.sellers.contains_key(&seller_id) {
            return Err(CoreError::NotFound {
                entity: "SellerRegistration",
                id: seller_id.to_string(),
            }
            .into());
        }
        if session.status() == OnboardingStatus::InProgress
            && tables
                .sessions
                .values()
                .any(|s| s.seller_id == seller_id && is_active(s))
        {
            return Err(CoreError::Conflict(format!(
                "Seller {seller_id} already has an onboarding session in progress"
            ))
            .into());
        }

        tables.next_session_id += 1;
        let now = Utc::now();
        let stored = StoredSession {
            id: tables.next_session_id,
            seller_id,
            session: session.clone(),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        tables.sessions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_session(&self, id: DbId) -> AppResult<Option<StoredSession>> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn find_active_session(&self, seller_id: DbId) -> AppResult<Option<StoredSession>> {
        Ok(self
            .tables
            .read()
            .await
            .sessions
            .values()
            .rev()
            .find(|s| s.seller_id == seller_id && is_active(s))
            .cloned())
    }

    async fn find_last_completed_session(
        &self,
        seller_id: DbId,
    ) -> AppResult<Option<StoredSession>> {
        Ok(self
            .tables
            .read()
            .await
            .sessions
            .values()
            .rev()
            .find(|s| {
                s.seller_id == seller_id && s.session.status() == OnboardingStatus::Completed
            })
            .cloned())
    }

    async fn save_session(&self, stored: &StoredSession) -> AppResult<StoredSession> {
        self.tables.write().await.save_session(stored)
    }

    async fn save_session_with_seller_status(
        &self,
        stored: &StoredSession,
        from: SellerStatus,
        to: SellerStatus,
    ) -> AppResult<StoredSession> {
        let mut tables = self.tables.write().await;
        let seller_status = tables
            .sellers
            .get(&stored.seller_id)
            .map(|seller| seller.status.as_str());
        if seller_status != Some(from.as_str()) {
            return Err(seller_status_changed(stored.seller_id, from));
        }

        let saved = tables.save_session(stored)?;
        if let Some(seller) = tables.sellers.get_mut(&stored.seller_id) {
            seller.status = to.as_str().to_string();
            seller.updated_at = Utc::now();
        }
        Ok(saved)
    }
}
