//! Payment processor integration for seller payouts.
//!
//! Each seller gets a connected account at the processor. The marketplace
//! creates the account, hands the seller an onboarding link hosted by the
//! processor, and later checks whether the account can take charges and
//! receive payouts.
//!
//! [`PaymentProcessor`] is the seam; [`stripe::StripeClient`] talks to the
//! Stripe REST API and [`mock::MockProcessor`] is used when no API key is
//! configured.

pub mod mock;
pub mod stripe;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Data needed to open a connected account for a seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAccountRequest {
    pub seller_id: String,
    pub email: String,
    pub business_name: String,
}

/// A connected account as created by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectAccount {
    pub id: String,
}

/// Readiness of a connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatus {
    pub account_id: String,
    pub charges_enabled: bool,
    pub payouts_enabled: bool,
    pub details_submitted: bool,
}

impl AccountStatus {
    /// The seller finished the processor's onboarding and can be paid.
    pub fn is_ready(&self) -> bool {
        self.charges_enabled && self.payouts_enabled && self.details_submitted
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The processor answered with a non-2xx status.
    #[error("Payment processor returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Payment processor configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Processor trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn create_connect_account(
        &self,
        request: &ConnectAccountRequest,
    ) -> Result<ConnectAccount, PaymentError>;

    /// URL where the seller completes the processor's hosted onboarding.
    async fn create_onboarding_link(&self, account_id: &str) -> Result<String, PaymentError>;

    async fn account_status(&self, account_id: &str) -> Result<AccountStatus, PaymentError>;
}
