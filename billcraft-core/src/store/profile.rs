use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::{Profile, UpdateProfile};

/// Fetches the user's company profile, if one has been saved.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Creates or updates the user's profile.
///
/// Absent fields fall back to the stored values, or to the placeholder
/// defaults on first save. One row per user.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    input: UpdateProfile,
) -> Result<Profile, sqlx::Error> {
    let current = get_profile(pool, user_id)
        .await?
        .unwrap_or_else(|| Profile::placeholder(user_id));

    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles
            (user_id, company_name, company_address, company_email, company_phone, tax_id,
             bank_details, default_currency, default_tax_rate, default_payment_terms)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (user_id) DO UPDATE SET
            company_name = EXCLUDED.company_name,
            company_address = EXCLUDED.company_address,
            company_email = EXCLUDED.company_email,
            company_phone = EXCLUDED.company_phone,
            tax_id = EXCLUDED.tax_id,
            bank_details = EXCLUDED.bank_details,
            default_currency = EXCLUDED.default_currency,
            default_tax_rate = EXCLUDED.default_tax_rate,
            default_payment_terms = EXCLUDED.default_payment_terms,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(input.company_name.unwrap_or(current.company_name))
    .bind(input.company_address.unwrap_or(current.company_address))
    .bind(input.company_email.or(current.company_email))
    .bind(input.company_phone.or(current.company_phone))
    .bind(input.tax_id.or(current.tax_id))
    .bind(input.bank_details.or(current.bank_details))
    .bind(input.default_currency.unwrap_or(current.default_currency))
    .bind(input.default_tax_rate.unwrap_or(current.default_tax_rate))
    .bind(
        input
            .default_payment_terms
            .unwrap_or(current.default_payment_terms),
    )
    .fetch_one(pool)
    .await
}
