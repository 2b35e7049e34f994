pub mod catalog;
pub mod onboarding;
pub mod sellers;
pub mod stripe;
pub mod uploads;
