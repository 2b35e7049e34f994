use std::sync::Arc;

use origen_payments::PaymentProcessor;

use crate::config::ServerConfig;
use crate::previews::PreviewCache;
use crate::store::SellerStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Registration and onboarding session storage.
    pub store: Arc<dyn SellerStore>,
    /// Stripe Connect, or the in-process mock in development.
    pub payments: Arc<dyn PaymentProcessor>,
    /// Image previews for uploaded files.
    pub previews: Arc<PreviewCache>,
    pub config: Arc<ServerConfig>,
}
