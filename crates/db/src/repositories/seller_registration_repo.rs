//! Repository for the `seller_registrations` table.

use origen_core::registration::NewSellerRegistration;
use origen_core::types::DbId;
use sqlx::PgPool;

use crate::models::seller_registration::SellerRegistration;

/// Column list for `seller_registrations` queries.
const COLUMNS: &str = "id, contact_name, contact_surname, email, phone, business_name, \
     business_type, province, city, producer_category, why_origin, status, \
     stripe_account_id, created_at, updated_at";

pub struct SellerRegistrationRepo;

impl SellerRegistrationRepo {
    /// Insert a validated registration. New rows start in `pending_approval`.
    ///
    /// A duplicate email violates `uq_seller_registrations_email`.
    pub async fn create(
        pool: &PgPool,
        input: &NewSellerRegistration,
    ) -> Result<SellerRegistration, sqlx::Error> {
        let query = format!(
            "INSERT INTO seller_registrations \
                (contact_name, contact_surname, email, phone, business_name, \
                 business_type, province, city, producer_category, why_origin) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SellerRegistration>(&query)
            .bind(&input.contact_name)
            .bind(&input.contact_surname)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.business_name)
            .bind(&input.business_type)
            .bind(&input.province)
            .bind(&input.city)
            .bind(input.producer_category.slug())
            .bind(&input.why_origin)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SellerRegistration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seller_registrations WHERE id = $1");
        sqlx::query_as::<_, SellerRegistration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a registration by its (lower-cased) email.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<SellerRegistration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seller_registrations WHERE email = $1");
        sqlx::query_as::<_, SellerRegistration>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<SellerRegistration>, sqlx::Error> {
        let query = format!(
            "UPDATE seller_registrations SET status = $2 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SellerRegistration>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Record the Stripe connected account created for a seller.
    pub async fn set_stripe_account(
        pool: &PgPool,
        id: DbId,
        account_id: &str,
    ) -> Result<Option<SellerRegistration>, sqlx::Error> {
        let query = format!(
            "UPDATE seller_registrations SET stripe_account_id = $2 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SellerRegistration>(&query)
            .bind(id)
            .bind(account_id)
            .fetch_optional(pool)
            .await
    }
}
