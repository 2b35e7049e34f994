//! Seller registration form: field rules and normalization.
//!
//! The registration form is the public entry point for producers who want
//! to sell on the marketplace. A valid submission becomes a registration
//! record in `pending_approval` status.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::catalog::{self, ProducerCategory};
use crate::error::CoreError;
use crate::validation::{self, FieldErrors};

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

pub const CONTACT_NAME_MIN: usize = 2;
pub const CONTACT_NAME_MAX: usize = 50;
pub const CONTACT_SURNAME_MIN: usize = 2;
pub const CONTACT_SURNAME_MAX: usize = 100;
pub const BUSINESS_NAME_MIN: usize = 3;
pub const BUSINESS_NAME_MAX: usize = 200;
pub const WHY_ORIGIN_MIN: usize = 50;
pub const WHY_ORIGIN_MAX: usize = 300;

/// Spanish mobile numbers, optionally prefixed with the country code.
pub const PHONE_PATTERN: &str = r"^(\+34|0034|34)?[6789]\d{8}$";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

/// Raw registration form as submitted.
///
/// Every field defaults so that a missing field is reported as a field
/// error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub contact_name: String,
    pub contact_surname: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
    pub business_type: String,
    pub province: String,
    pub city: String,
    pub producer_category: String,
    pub why_origin: String,
    pub accepts_terms: bool,
    pub accepts_privacy: bool,
}

/// A registration that passed validation, with normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSellerRegistration {
    pub contact_name: String,
    pub contact_surname: String,
    /// Lower-cased.
    pub email: String,
    /// Whitespace removed.
    pub phone: String,
    pub business_name: String,
    pub business_type: String,
    pub province: String,
    pub city: String,
    pub producer_category: ProducerCategory,
    pub why_origin: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a phone number against [`PHONE_PATTERN`] after removing whitespace.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(&normalize_phone(phone))
}

fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collect every field error for a registration form.
pub fn registration_field_errors(form: &RegistrationForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    validation::require_length(
        &mut errors,
        "contactName",
        &form.contact_name,
        CONTACT_NAME_MIN,
        CONTACT_NAME_MAX,
    );
    validation::require_length(
        &mut errors,
        "contactSurname",
        &form.contact_surname,
        CONTACT_SURNAME_MIN,
        CONTACT_SURNAME_MAX,
    );

    let email = form.email.trim().to_lowercase();
    if email.is_empty() {
        errors.add("email", "This field is required");
    } else if !email.validate_email() {
        errors.add("email", "Enter a valid email address");
    }

    if form.phone.trim().is_empty() {
        errors.add("phone", "This field is required");
    } else if !is_valid_phone(&form.phone) {
        errors.add("phone", "Enter a valid Spanish mobile number");
    }

    validation::require_length(
        &mut errors,
        "businessName",
        &form.business_name,
        BUSINESS_NAME_MIN,
        BUSINESS_NAME_MAX,
    );
    validation::require_text(&mut errors, "businessType", &form.business_type);

    let province = form.province.trim();
    if province.is_empty() {
        errors.add("province", "This field is required");
    } else if !catalog::is_known_province(province) {
        errors.add("province", "Unknown province");
    }

    validation::require_text(&mut errors, "city", &form.city);

    let category = form.producer_category.trim();
    if category.is_empty() {
        errors.add("producerCategory", "This field is required");
    } else if ProducerCategory::from_slug(category).is_err() {
        errors.add("producerCategory", "Unknown producer category");
    }

    validation::require_length(
        &mut errors,
        "whyOrigin",
        &form.why_origin,
        WHY_ORIGIN_MIN,
        WHY_ORIGIN_MAX,
    );
    validation::require_accepted(&mut errors, "acceptsTerms", form.accepts_terms);
    validation::require_accepted(&mut errors, "acceptsPrivacy", form.accepts_privacy);

    errors
}

/// Validate a registration form and return its normalized form.
pub fn validate_registration(form: &RegistrationForm) -> Result<NewSellerRegistration, CoreError> {
    registration_field_errors(form).into_result()?;

    Ok(NewSellerRegistration {
        contact_name: form.contact_name.trim().to_string(),
        contact_surname: form.contact_surname.trim().to_string(),
        email: form.email.trim().to_lowercase(),
        phone: normalize_phone(&form.phone),
        business_name: form.business_name.trim().to_string(),
        business_type: form.business_type.trim().to_string(),
        province: form.province.trim().to_string(),
        city: form.city.trim().to_string(),
        producer_category: ProducerCategory::from_slug(form.producer_category.trim())?,
        why_origin: form.why_origin.trim().to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            contact_name: "Lucía".into(),
            contact_surname: "García Pérez".into(),
            email: "  Lucia@Huerta.ES ".into(),
            phone: "612 345 678".into(),
            business_name: "Huerta del Jarama".into(),
            business_type: "autonomo".into(),
            province: "madrid".into(),
            city: "Aranjuez".into(),
            producer_category: "vegetales".into(),
            why_origin: "Cultivamos verdura de temporada en la vega del Jarama desde hace tres generaciones.".into(),
            accepts_terms: true,
            accepts_privacy: true,
        }
    }

    #[test]
    fn valid_form_is_normalized() {
        let reg = validate_registration(&valid_form()).unwrap();
        assert_eq!(reg.email, "lucia@huerta.es");
        assert_eq!(reg.phone, "612345678");
        assert_eq!(reg.producer_category, ProducerCategory::Vegetales);
    }

    #[test]
    fn phone_pattern() {
        assert!(is_valid_phone("612345678"));
        assert!(is_valid_phone("+34712345678"));
        assert!(is_valid_phone("0034912345678"));
        assert!(is_valid_phone("34812345678"));
        assert!(!is_valid_phone("512345678"));
        assert!(!is_valid_phone("61234567"));
        assert!(!is_valid_phone("6123456789"));
        assert!(!is_valid_phone("+33612345678"));
    }

    #[test]
    fn invalid_phone_is_reported() {
        let form = RegistrationForm {
            phone: "512345678".into(),
            ..valid_form()
        };
        let errors = registration_field_errors(&form);
        assert_eq!(errors.field_names(), vec!["phone"]);
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = registration_field_errors(&RegistrationForm::default());
        for field in [
            "contactName",
            "contactSurname",
            "email",
            "phone",
            "businessName",
            "businessType",
            "province",
            "city",
            "producerCategory",
            "whyOrigin",
            "acceptsTerms",
            "acceptsPrivacy",
        ] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn length_limits() {
        let form = RegistrationForm {
            contact_name: "L".into(),
            contact_surname: "x".repeat(101),
            business_name: "ab".into(),
            why_origin: "x".repeat(49),
            ..valid_form()
        };
        let errors = registration_field_errors(&form);
        assert_eq!(
            errors.field_names(),
            vec!["businessName", "contactName", "contactSurname", "whyOrigin"]
        );

        let form = RegistrationForm {
            contact_name: "x".repeat(50),
            contact_surname: "x".repeat(100),
            business_name: "x".repeat(200),
            why_origin: "x".repeat(300),
            ..valid_form()
        };
        assert!(registration_field_errors(&form).is_empty());

        let form = RegistrationForm {
            why_origin: "x".repeat(301),
            ..valid_form()
        };
        assert!(registration_field_errors(&form).contains("whyOrigin"));
    }

    #[test]
    fn invalid_email() {
        let form = RegistrationForm {
            email: "not-an-email".into(),
            ..valid_form()
        };
        assert_matches!(
            validate_registration(&form),
            Err(CoreError::InvalidFields(errors)) if errors.contains("email")
        );
    }

    #[test]
    fn unknown_province_and_category() {
        let form = RegistrationForm {
            province: "atlantida".into(),
            producer_category: "tornillos".into(),
            ..valid_form()
        };
        let errors = registration_field_errors(&form);
        assert_eq!(errors.field_names(), vec!["producerCategory", "province"]);
    }

    #[test]
    fn terms_and_privacy_must_be_accepted() {
        let form = RegistrationForm {
            accepts_terms: false,
            accepts_privacy: false,
            ..valid_form()
        };
        let errors = registration_field_errors(&form);
        assert_eq!(errors.field_names(), vec!["acceptsPrivacy", "acceptsTerms"]);
    }

    #[test]
    fn form_deserializes_from_camel_case_with_missing_fields() {
        let form: RegistrationForm =
            serde_json::from_value(serde_json::json!({ "contactName": "Ana" })).unwrap();
        assert_eq!(form.contact_name, "Ana");
        assert!(!form.accepts_terms);
    }
}
