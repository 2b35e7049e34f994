//! Domain logic for the Origen seller onboarding service.
//!
//! Everything in this crate is pure: no I/O, no clocks beyond what callers
//! pass in. The API and database crates build on these types.

pub mod catalog;
pub mod error;
pub mod onboarding_wizard;
pub mod registration;
pub mod seller_status;
pub mod types;
pub mod uploads;
pub mod validation;
