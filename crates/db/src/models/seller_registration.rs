//! Seller registration entity model.

use origen_core::error::CoreError;
use origen_core::seller_status::SellerStatus;
use origen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `seller_registrations` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerRegistration {
    pub id: DbId,
    pub contact_name: String,
    pub contact_surname: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
    pub business_type: String,
    pub province: String,
    pub city: String,
    pub producer_category: String,
    pub why_origin: String,
    pub status: String,
    pub stripe_account_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SellerRegistration {
    /// Parsed lifecycle status.
    pub fn seller_status(&self) -> Result<SellerStatus, CoreError> {
        SellerStatus::from_str_db(&self.status)
    }
}
