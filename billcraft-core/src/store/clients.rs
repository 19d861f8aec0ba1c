use sqlx::PgPool;
use uuid::Uuid;

use crate::models::client::{Client, CreateClient, UpdateClient};

/// Lists all clients owned by `user_id`, ordered by name.
pub async fn list_clients(pool: &PgPool, user_id: Uuid) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE user_id = $1 ORDER BY name")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Fetches one client by id, scoped to its owner.
pub async fn get_client(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Creates a client with a generated id and timestamps.
pub async fn create_client(
    pool: &PgPool,
    user_id: Uuid,
    input: CreateClient,
) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (id, user_id, name, email, address, phone, city, state, zip_code, country)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(input.name)
    .bind(input.email)
    .bind(input.address)
    .bind(input.phone)
    .bind(input.city)
    .bind(input.state)
    .bind(input.zip_code)
    .bind(input.country)
    .fetch_one(pool)
    .await
}

/// Applies a partial update; absent fields keep their stored values.
///
/// Returns `None` when no client with that id belongs to the user.
pub async fn update_client(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    input: UpdateClient,
) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients SET
            name = COALESCE($3, name),
            email = COALESCE($4, email),
            address = COALESCE($5, address),
            phone = COALESCE($6, phone),
            city = COALESCE($7, city),
            state = COALESCE($8, state),
            zip_code = COALESCE($9, zip_code),
            country = COALESCE($10, country),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(input.name)
    .bind(input.email)
    .bind(input.address)
    .bind(input.phone)
    .bind(input.city)
    .bind(input.state)
    .bind(input.zip_code)
    .bind(input.country)
    .fetch_optional(pool)
    .await
}

/// Deletes a client. Returns whether a row was removed.
pub async fn delete_client(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
