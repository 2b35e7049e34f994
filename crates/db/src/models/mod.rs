//! Row structs for the persisted entities.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row plus the conversions to and from the domain types in `origen-core`.

pub mod onboarding_session;
pub mod seller_registration;
