//! Stripe Connect client over the Stripe REST API.
//!
//! Creates Express accounts, account onboarding links and reads account
//! readiness. Requests are form-encoded and authenticated with the secret
//! key as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{AccountStatus, ConnectAccount, ConnectAccountRequest, PaymentError, PaymentProcessor};

/// HTTP request timeout for a single Stripe call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// API root, overridable for stripe-mock or a proxy.
    pub api_base: String,
    /// Where Stripe sends the seller when an onboarding link expires.
    pub refresh_url: String,
    /// Where Stripe sends the seller after onboarding.
    pub return_url: String,
    /// Two-letter country of the connected accounts.
    pub country: String,
}

impl StripeConfig {
    /// Load Stripe settings from the environment.
    ///
    /// Returns `None` when `STRIPE_SECRET_KEY` is unset.
    ///
    /// | Env Var              | Default                                      |
    /// |----------------------|----------------------------------------------|
    /// | `STRIPE_SECRET_KEY`  | (none)                                       |
    /// | `STRIPE_API_BASE`    | `https://api.stripe.com`                     |
    /// | `STRIPE_REFRESH_URL` | `http://localhost:5173/onboarding?stripe=refresh` |
    /// | `STRIPE_RETURN_URL`  | `http://localhost:5173/onboarding?stripe=return`  |
    /// | `STRIPE_COUNTRY`     | `ES`                                         |
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };
        Some(Self {
            secret_key,
            api_base: var("STRIPE_API_BASE", DEFAULT_API_BASE),
            refresh_url: var(
                "STRIPE_REFRESH_URL",
                "http://localhost:5173/onboarding?stripe=refresh",
            ),
            return_url: var(
                "STRIPE_RETURN_URL",
                "http://localhost:5173/onboarding?stripe=return",
            ),
            country: var("STRIPE_COUNTRY", "ES"),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AccountLink {
    url: String,
}

#[derive(Debug, Deserialize)]
struct AccountObject {
    id: String,
    #[serde(default)]
    charges_enabled: bool,
    #[serde(default)]
    payouts_enabled: bool,
    #[serde(default)]
    details_submitted: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pull the human-readable message out of a Stripe error body, falling
/// back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| body.to_string())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct StripeClient {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        if config.secret_key.trim().is_empty() {
            return Err(PaymentError::Config("Stripe secret key is empty".into()));
        }
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.config.api_base.trim_end_matches('/'))
    }

    /// Check the response status and decode the JSON body.
    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_connect_account(
        &self,
        request: &ConnectAccountRequest,
    ) -> Result<ConnectAccount, PaymentError> {
        let form = [
            ("type", "express"),
            ("country", self.config.country.as_str()),
            ("email", request.email.as_str()),
            ("business_profile[name]", request.business_name.as_str()),
            ("metadata[seller_id]", request.seller_id.as_str()),
            ("capabilities[card_payments][requested]", "true"),
            ("capabilities[transfers][requested]", "true"),
        ];
        let response = self
            .client
            .post(self.url("accounts"))
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await?;
        let account: ConnectAccount = Self::decode(response).await?;

        tracing::info!(
            account_id = %account.id,
            seller_id = %request.seller_id,
            "Stripe connected account created"
        );
        Ok(account)
    }

    async fn create_onboarding_link(&self, account_id: &str) -> Result<String, PaymentError> {
        let form = [
            ("account", account_id),
            ("refresh_url", self.config.refresh_url.as_str()),
            ("return_url", self.config.return_url.as_str()),
            ("type", "account_onboarding"),
        ];
        let response = self
            .client
            .post(self.url("account_links"))
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await?;
        let link: AccountLink = Self::decode(response).await?;
        Ok(link.url)
    }

    async fn account_status(&self, account_id: &str) -> Result<AccountStatus, PaymentError> {
        let response = self
            .client
            .get(self.url(&format!("accounts/{account_id}")))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;
        let account: AccountObject = Self::decode(response).await?;
        Ok(AccountStatus {
            account_id: account.id,
            charges_enabled: account.charges_enabled,
            payouts_enabled: account.payouts_enabled,
            details_submitted: account.details_submitted,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
