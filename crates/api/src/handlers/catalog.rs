//! Read-only catalog tables the registration form and the wizard render.

use axum::Json;
use serde::Serialize;

use origen_core::catalog::{ProducerCategory, ShippingMethod, PROVINCES, VALUE_TAGS};
use origen_core::onboarding_wizard::StepId;

use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub slug: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NamedEntry {
    pub slug: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ShippingEntry {
    pub id: ShippingMethod,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StepEntry {
    pub id: StepId,
    pub index: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// GET /catalog/categories
pub async fn list_categories() -> Json<DataResponse<Vec<CategoryEntry>>> {
    let data = ProducerCategory::ALL
        .into_iter()
        .map(|c| CategoryEntry {
            slug: c.slug(),
            label: c.label(),
            icon: c.icon(),
        })
        .collect();
    Json(DataResponse { data })
}

/// GET /catalog/provinces
pub async fn list_provinces() -> Json<DataResponse<Vec<NamedEntry>>> {
    let data = PROVINCES
        .iter()
        .map(|&(slug, name)| NamedEntry { slug, name })
        .collect();
    Json(DataResponse { data })
}

/// GET /catalog/values
pub async fn list_values() -> Json<DataResponse<Vec<NamedEntry>>> {
    let data = VALUE_TAGS
        .iter()
        .map(|&(slug, name)| NamedEntry { slug, name })
        .collect();
    Json(DataResponse { data })
}

/// GET /catalog/shipping-methods
pub async fn list_shipping_methods() -> Json<DataResponse<Vec<ShippingEntry>>> {
    let data = ShippingMethod::ALL
        .into_iter()
        .map(|m| ShippingEntry {
            id: m,
            label: m.label(),
            icon: m.icon(),
        })
        .collect();
    Json(DataResponse { data })
}

/// GET /catalog/steps
pub async fn list_steps() -> Json<DataResponse<Vec<StepEntry>>> {
    let data = StepId::ALL
        .into_iter()
        .map(|s| StepEntry {
            id: s,
            index: s.index(),
            title: s.title(),
            description: s.description(),
            icon: s.icon(),
        })
        .collect();
    Json(DataResponse { data })
}
