//! Repository for the `onboarding_sessions` table.

use origen_core::types::DbId;
use sqlx::PgPool;

use crate::models::onboarding_session::{OnboardingSessionRow, SessionColumns};

/// Column list for `onboarding_sessions` queries.
const COLUMNS: &str = "id, seller_id, current_step, step_data, status, last_error, \
     version, created_at, updated_at";

/// Result of saving a session together with a seller status change.
#[derive(Debug)]
pub enum SubmitOutcome {
    Saved(OnboardingSessionRow),
    /// The session is gone or was saved by someone else since it was loaded.
    StaleSession,
    /// The seller is no longer in the status the change starts from.
    SellerStatusChanged,
}

/// Provides persistence for wizard sessions.
pub struct OnboardingSessionRepo;

impl OnboardingSessionRepo {
    /// Insert a new session for a seller.
    ///
    /// At most one session per seller may be `in_progress`
    /// (`uq_onboarding_sessions_active_seller`).
    pub async fn create(
        pool: &PgPool,
        seller_id: DbId,
        columns: &SessionColumns,
    ) -> Result<OnboardingSessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO onboarding_sessions \
                (seller_id, current_step, step_data, status, last_error) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingSessionRow>(&query)
            .bind(seller_id)
            .bind(columns.current_step)
            .bind(&columns.step_data)
            .bind(columns.status)
            .bind(&columns.last_error)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OnboardingSessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboarding_sessions WHERE id = $1");
        sqlx::query_as::<_, OnboardingSessionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The seller's in-progress session, if any.
    pub async fn find_active_by_seller(
        pool: &PgPool,
        seller_id: DbId,
    ) -> Result<Option<OnboardingSessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_sessions \
             WHERE seller_id = $1 AND status = 'in_progress' \
             ORDER BY created_at DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, OnboardingSessionRow>(&query)
            .bind(seller_id)
            .fetch_optional(pool)
            .await
    }

    /// The seller's most recently completed session, if any.
    pub async fn find_last_completed_by_seller(
        pool: &PgPool,
        seller_id: DbId,
    ) -> Result<Option<OnboardingSessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_sessions \
             WHERE seller_id = $1 AND status = 'completed' \
             ORDER BY updated_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, OnboardingSessionRow>(&query)
            .bind(seller_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the step index, payloads, status and last error.
    ///
    /// Only applies while the row is still at `expected_version`; returns
    /// `None` when the row is missing or has moved on.
    pub async fn save(
        pool: &PgPool,
        id: DbId,
        expected_version: i64,
        columns: &SessionColumns,
    ) -> Result<Option<OnboardingSessionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE onboarding_sessions \
             SET current_step = $2, step_data = $3, status = $4, last_error = $5, \
                 version = version + 1 \
             WHERE id = $1 AND version = $6 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingSessionRow>(&query)
            .bind(id)
            .bind(columns.current_step)
            .bind(&columns.step_data)
            .bind(columns.status)
            .bind(&columns.last_error)
            .bind(expected_version)
            .fetch_optional(pool)
            .await
    }

    /// Save a session and move its seller from `from_status` to
    /// `to_status` in one transaction. Nothing is written unless both
    /// the session version and the seller status still match.
    pub async fn save_with_seller_status(
        pool: &PgPool,
        id: DbId,
        expected_version: i64,
        columns: &SessionColumns,
        from_status: &str,
        to_status: &str,
    ) -> Result<SubmitOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE onboarding_sessions \
             SET current_step = $2, step_data = $3, status = $4, last_error = $5, \
                 version = version + 1 \
             WHERE id = $1 AND version = $6 \
             RETURNING {COLUMNS}"
        );
        let Some(row) = sqlx::query_as::<_, OnboardingSessionRow>(&query)
            .bind(id)
            .bind(columns.current_step)
            .bind(&columns.step_data)
            .bind(columns.status)
            .bind(&columns.last_error)
            .bind(expected_version)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(SubmitOutcome::StaleSession);
        };

        let updated = sqlx::query(
            "UPDATE seller_registrations SET status = $3 \
             WHERE id = $1 AND status = $2",
        )
        .bind(row.seller_id)
        .bind(from_status)
        .bind(to_status)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(SubmitOutcome::SellerStatusChanged);
        }

        tx.commit().await?;
        Ok(SubmitOutcome::Saved(row))
    }
}
