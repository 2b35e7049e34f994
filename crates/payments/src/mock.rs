//! In-process payment processor for development and tests.
//!
//! Account ids are derived from the seller id so repeated calls are stable.
//! Accounts report as ready once created.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{AccountStatus, ConnectAccount, ConnectAccountRequest, PaymentError, PaymentProcessor};

const MOCK_ONBOARDING_BASE: &str = "https://connect.example.test/onboarding";

#[derive(Debug, Default)]
pub struct MockProcessor {
    accounts: Mutex<HashSet<String>>,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn known(&self, account_id: &str) -> bool {
        self.accounts
            .lock()
            .map(|accounts| accounts.contains(account_id))
            .unwrap_or(false)
    }
}

fn not_found(account_id: &str) -> PaymentError {
    PaymentError::Api {
        status: 404,
        message: format!("No such account: '{account_id}'"),
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_connect_account(
        &self,
        request: &ConnectAccountRequest,
    ) -> Result<ConnectAccount, PaymentError> {
        let id = format!("acct_mock_{}", request.seller_id);
        self.accounts
            .lock()
            .map_err(|_| PaymentError::Config("mock account registry poisoned".into()))?
            .insert(id.clone());
        Ok(ConnectAccount { id })
    }

    async fn create_onboarding_link(&self, account_id: &str) -> Result<String, PaymentError> {
        if !self.known(account_id) {
            return Err(not_found(account_id));
        }
        Ok(format!("{MOCK_ONBOARDING_BASE}/{account_id}"))
    }

    async fn account_status(&self, account_id: &str) -> Result<AccountStatus, PaymentError> {
        if !self.known(account_id) {
            return Err(not_found(account_id));
        }
        Ok(AccountStatus {
            account_id: account_id.to_string(),
            charges_enabled: true,
            payouts_enabled: true,
            details_submitted: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request() -> ConnectAccountRequest {
        ConnectAccountRequest {
            seller_id: "42".into(),
            email: "lucia@huerta.es".into(),
            business_name: "Huerta del Jarama".into(),
        }
    }

    #[tokio::test]
    async fn create_link_and_status() {
        let processor = MockProcessor::new();
        let account = processor.create_connect_account(&request()).await.unwrap();
        assert_eq!(account.id, "acct_mock_42");

        let url = processor.create_onboarding_link(&account.id).await.unwrap();
        assert!(url.ends_with("/acct_mock_42"));

        let status = processor.account_status(&account.id).await.unwrap();
        assert!(status.is_ready());
    }

    #[tokio::test]
    async fn unknown_account_is_404() {
        let processor = MockProcessor::new();
        assert_matches!(
            processor.account_status("acct_nope").await,
            Err(PaymentError::Api { status: 404, .. })
        );
    }
}
