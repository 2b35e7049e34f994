pub mod catalog;
pub mod health;
pub mod onboarding;
pub mod sellers;
pub mod stripe;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sellers/register                                register (public)
/// /sellers/{id}                                    registration record
/// /sellers/{id}/status                             status view, transition (PUT)
/// /seller-statuses                                 full status table
///
/// /stripe/connect                                  connected account + onboarding link
/// /stripe/accounts/{account_id}                    account readiness
///
/// /catalog/categories                              producer categories
/// /catalog/provinces                               provinces
/// /catalog/values                                  story value tags
/// /catalog/shipping-methods                        shipping methods
/// /catalog/steps                                   wizard steps
///
/// /onboarding-sessions                             create / resume (POST)
/// /onboarding-sessions/{id}                        snapshot
/// /onboarding-sessions/{id}/step-data              current step payload (PUT)
/// /onboarding-sessions/{id}/next|back              navigation (POST)
/// /onboarding-sessions/{id}/complete|abandon       terminal transitions (POST)
/// /onboarding-sessions/{id}/files/{slot}           upload (multipart POST)
/// /onboarding-sessions/{id}/files/{slot}/{file_id} remove (DELETE)
/// /onboarding-sessions/{id}/files/{slot}/{file_id}/status  file status (PUT)
///
/// /uploads/{file_id}/preview                       image preview bytes
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sellers", sellers::router())
        .nest("/seller-statuses", sellers::statuses_router())
        .nest("/stripe", stripe::router())
        .nest("/catalog", catalog::router())
        .nest("/onboarding-sessions", onboarding::router())
        .nest("/uploads", onboarding::uploads_router())
}
