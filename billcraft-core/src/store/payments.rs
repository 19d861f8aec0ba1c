use sqlx::PgPool;
use uuid::Uuid;

use crate::models::payment::{CreatePayment, Payment};

/// Lists all payments recorded by `user_id`, most recent first.
pub async fn list_payments(pool: &PgPool, user_id: Uuid) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE user_id = $1 ORDER BY payment_date DESC, created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Records a payment against one of the user's invoices.
///
/// Returns `None` when the referenced invoice does not exist or is not
/// owned by the user.
pub async fn create_payment(
    pool: &PgPool,
    user_id: Uuid,
    input: CreatePayment,
) -> Result<Option<Payment>, sqlx::Error> {
    let invoice_exists: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM invoices WHERE id = $1 AND user_id = $2")
            .bind(input.invoice_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    if invoice_exists.is_none() {
        return Ok(None);
    }

    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (id, user_id, invoice_id, amount, payment_date, payment_method, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(input.invoice_id)
    .bind(input.amount)
    .bind(input.payment_date)
    .bind(&input.payment_method)
    .bind(&input.notes)
    .fetch_one(pool)
    .await?;

    Ok(Some(payment))
}

/// Deletes a payment. Returns whether a row was removed.
pub async fn delete_payment(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM payments WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
