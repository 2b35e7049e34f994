use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/catalog`.
///
/// ```text
/// GET    /categories         -> list_categories
/// GET    /provinces          -> list_provinces
/// GET    /values             -> list_values
/// GET    /shipping-methods   -> list_shipping_methods
/// GET    /steps              -> list_steps
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(catalog::list_categories))
        .route("/provinces", get(catalog::list_provinces))
        .route("/values", get(catalog::list_values))
        .route("/shipping-methods", get(catalog::list_shipping_methods))
        .route("/steps", get(catalog::list_steps))
}
