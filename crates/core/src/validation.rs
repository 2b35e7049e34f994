//! Field-level validation helpers shared by the registration form and the
//! onboarding step validators.
//!
//! Rules report at most one message per field (the first rule that fails),
//! which is what the form renders inline under the field.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;

/// Per-field error messages keyed by the camelCase field name used on the
/// wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field` unless it already has one.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// `Ok(())` when no field failed, otherwise [`CoreError::InvalidFields`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(self))
        }
    }
}

/// Require a non-blank string.
pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required");
    }
}

/// Require a trimmed length (in characters) within `min..=max`.
pub fn require_length(errors: &mut FieldErrors, field: &str, value: &str, min: usize, max: usize) {
    let len = value.trim().chars().count();
    if len == 0 {
        errors.add(field, "This field is required");
    } else if len < min {
        errors.add(field, format!("Must be at least {min} characters"));
    } else if len > max {
        errors.add(field, format!("Must be at most {max} characters"));
    }
}

/// Require a trimmed length (in characters) of at least `min`.
pub fn require_min_length(errors: &mut FieldErrors, field: &str, value: &str, min: usize) {
    require_length(errors, field, value, min, usize::MAX);
}

/// Require a checkbox-style boolean to be accepted.
pub fn require_accepted(errors: &mut FieldErrors, field: &str, value: bool) {
    if !value {
        errors.add(field, "Must be accepted");
    }
}

/// Require a non-empty selection.
pub fn require_selection<T>(errors: &mut FieldErrors, field: &str, values: &[T]) {
    if values.is_empty() {
        errors.add(field, "Select at least one option");
    }
}
