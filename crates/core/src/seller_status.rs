//! Seller account status and the capability matrix it drives.
//!
//! The status decides what a seller may do (log in, publish products,
//! receive payouts) and which banner the dashboard shows. Transitions are
//! driven server-side; [`SellerStatus::can_transition_to`] encodes the
//! allowed lifecycle edges.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerStatus {
    PendingApproval,
    Rejected,
    ApprovedAccess,
    OnboardingInProgress,
    PendingVerification,
    Active,
    Suspended,
    Deactivated,
}

impl SellerStatus {
    pub const ALL: [SellerStatus; 8] = [
        Self::PendingApproval,
        Self::Rejected,
        Self::ApprovedAccess,
        Self::OnboardingInProgress,
        Self::PendingVerification,
        Self::Active,
        Self::Suspended,
        Self::Deactivated,
    ];

    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid seller status '{s}'")))
    }

    /// Convert to a database-compatible string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Rejected => "rejected",
            Self::ApprovedAccess => "approved_access",
            Self::OnboardingInProgress => "onboarding_in_progress",
            Self::PendingVerification => "pending_verification",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Deactivated => "deactivated",
        }
    }

    pub fn capabilities(self) -> Capabilities {
        // login, dashboard, edit profile, create, publish, payments
        let flags = match self {
            Self::PendingApproval => [false, false, false, false, false, false],
            Self::Rejected => [false, false, false, false, false, false],
            Self::ApprovedAccess => [true, true, true, false, false, false],
            Self::OnboardingInProgress => [true, true, true, true, false, false],
            Self::PendingVerification => [true, true, true, true, false, false],
            Self::Active => [true, true, true, true, true, true],
            Self::Suspended => [true, true, false, false, false, false],
            Self::Deactivated => [false, false, false, false, false, false],
        };
        Capabilities {
            can_login: flags[0],
            can_view_dashboard: flags[1],
            can_edit_profile: flags[2],
            can_create_products: flags[3],
            can_publish_products: flags[4],
            can_receive_payments: flags[5],
        }
    }

    /// Message shown to the seller for this status.
    pub fn message(self) -> &'static str {
        match self {
            Self::PendingApproval => {
                "Hemos recibido tu solicitud. Nuestro equipo la está revisando."
            }
            Self::Rejected => "Tu solicitud no ha sido aprobada. Contacta con nosotros si quieres más información.",
            Self::ApprovedAccess => "¡Bienvenido! Completa el proceso de alta para empezar a vender.",
            Self::OnboardingInProgress => "Continúa el proceso de alta donde lo dejaste.",
            Self::PendingVerification => {
                "Estamos verificando tu documentación. Te avisaremos cuando esté lista."
            }
            Self::Active => "Tu tienda está activa.",
            Self::Suspended => "Tu cuenta está suspendida temporalmente. Contacta con soporte.",
            Self::Deactivated => "Tu cuenta está desactivada.",
        }
    }

    pub fn next_action(self) -> Option<NextAction> {
        let (label, href) = match self {
            Self::Rejected => ("Contactar", "/contacto"),
            Self::ApprovedAccess => ("Empezar alta", "/onboarding"),
            Self::OnboardingInProgress => ("Continuar alta", "/onboarding"),
            Self::Active => ("Ir al panel", "/dashboard"),
            Self::Suspended => ("Contactar con soporte", "/soporte"),
            Self::PendingApproval | Self::PendingVerification | Self::Deactivated => return None,
        };
        Some(NextAction { label, href })
    }

    pub fn banner_variant(self) -> BannerVariant {
        match self {
            Self::PendingApproval | Self::PendingVerification => BannerVariant::Warning,
            Self::ApprovedAccess | Self::OnboardingInProgress => BannerVariant::Info,
            Self::Active => BannerVariant::Success,
            Self::Rejected | Self::Suspended | Self::Deactivated => BannerVariant::Error,
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: SellerStatus) -> bool {
        use SellerStatus::*;
        matches!(
            (self, next),
            (PendingApproval, Rejected)
                | (PendingApproval, ApprovedAccess)
                | (ApprovedAccess, OnboardingInProgress)
                | (OnboardingInProgress, PendingVerification)
                | (PendingVerification, OnboardingInProgress)
                | (PendingVerification, Active)
                | (Active, Suspended)
                | (Active, Deactivated)
                | (Suspended, Active)
                | (Suspended, Deactivated)
        )
    }

    /// Like [`can_transition_to`](Self::can_transition_to) but returns a
    /// conflict error naming both ends.
    pub fn ensure_transition(self, next: SellerStatus) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Cannot change seller status from '{}' to '{}'",
                self.as_str(),
                next.as_str()
            )))
        }
    }

    pub fn view(self) -> StatusView {
        StatusView {
            status: self,
            capabilities: self.capabilities(),
            message: self.message(),
            next_action: self.next_action(),
            banner: self.banner_variant(),
        }
    }
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_login: bool,
    pub can_view_dashboard: bool,
    pub can_edit_profile: bool,
    pub can_create_products: bool,
    pub can_publish_products: bool,
    pub can_receive_payments: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextAction {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerVariant {
    Info,
    Success,
    Warning,
    Error,
}

/// Everything the dashboard needs to render the status banner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub status: SellerStatus,
    pub capabilities: Capabilities,
    pub message: &'static str,
    pub next_action: Option<NextAction>,
    pub banner: BannerVariant,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
