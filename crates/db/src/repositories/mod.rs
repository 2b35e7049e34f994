//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod onboarding_session_repo;
pub mod seller_registration_repo;

pub use onboarding_session_repo::{OnboardingSessionRepo, SubmitOutcome};
pub use seller_registration_repo::SellerRegistrationRepo;
