//! Onboarding session entity model.
//!
//! Step payloads are stored as one JSONB document (`step_data`). The
//! transient submitting flag is never persisted. `version` increases on
//! every save; writers name the version they loaded.

use origen_core::error::CoreError;
use origen_core::onboarding_wizard::{OnboardingData, OnboardingSession, OnboardingStatus};
use origen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `onboarding_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OnboardingSessionRow {
    pub id: DbId,
    pub seller_id: DbId,
    pub current_step: i32,
    pub step_data: serde_json::Value,
    pub status: String,
    pub last_error: Option<String>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Column values derived from a domain session, ready to bind.
#[derive(Debug, Clone)]
pub struct SessionColumns {
    pub current_step: i32,
    pub step_data: serde_json::Value,
    pub status: &'static str,
    pub last_error: Option<String>,
}

impl SessionColumns {
    pub fn from_session(session: &OnboardingSession) -> Result<Self, CoreError> {
        let step_data = serde_json::to_value(session.data())
            .map_err(|e| CoreError::Internal(format!("Failed to encode step data: {e}")))?;
        Ok(Self {
            current_step: session.current_step().index() as i32,
            step_data,
            status: session.status().as_str(),
            last_error: session.last_error().map(str::to_string),
        })
    }
}

impl OnboardingSessionRow {
    /// Rebuild the domain session from the stored columns.
    pub fn to_session(&self) -> Result<OnboardingSession, CoreError> {
        let data: OnboardingData = serde_json::from_value(self.step_data.clone())
            .map_err(|e| CoreError::Internal(format!("Corrupt step data for session {}: {e}", self.id)))?;
        let index = usize::try_from(self.current_step).map_err(|_| {
            CoreError::Internal(format!(
                "Negative step index {} for session {}",
                self.current_step, self.id
            ))
        })?;
        OnboardingSession::restore(
            index,
            data,
            OnboardingStatus::from_str_db(&self.status)?,
            self.last_error.clone(),
        )
    }
}
