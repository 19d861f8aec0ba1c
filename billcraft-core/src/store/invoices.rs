use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::calc::{compute_totals, LineAmounts};
use crate::models::invoice::{
    CreateInvoice, Invoice, InvoiceItem, InvoiceItemInput, InvoiceStatus, UpdateInvoice,
};

/// Lists all invoices owned by `user_id`, newest first.
pub async fn list_invoices(pool: &PgPool, user_id: Uuid) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        "SELECT * FROM invoices WHERE user_id = $1 ORDER BY issue_date DESC, created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

async fn fetch_items<'e, E>(executor: E, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, InvoiceItem>(
        "SELECT * FROM invoice_items WHERE invoice_id = $1 ORDER BY sort_order",
    )
    .bind(invoice_id)
    .fetch_all(executor)
    .await
}

/// Fetches one invoice and its line items in print order.
pub async fn get_invoice(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<(Invoice, Vec<InvoiceItem>)>, sqlx::Error> {
    let invoice =
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    match invoice {
        Some(invoice) => {
            let items = fetch_items(pool, invoice.id).await?;
            Ok(Some((invoice, items)))
        }
        None => Ok(None),
    }
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    invoice_id: Uuid,
    inputs: &[InvoiceItemInput],
) -> Result<Vec<InvoiceItem>, sqlx::Error> {
    let mut items = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let line_total =
            crate::calc::line_total(input.quantity, input.unit_price, input.discount_rate);
        let item = sqlx::query_as::<_, InvoiceItem>(
            r#"
            INSERT INTO invoice_items
                (id, invoice_id, description, quantity, unit, unit_price, discount_rate, line_total, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(invoice_id)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(&input.unit)
        .bind(input.unit_price)
        .bind(input.discount_rate)
        .bind(line_total)
        .bind(index as i32)
        .fetch_one(&mut **tx)
        .await?;
        items.push(item);
    }
    Ok(items)
}

/// Creates an invoice with its line items in a single transaction.
///
/// Stored totals are derived by the calculator from the submitted
/// items; totals supplied by the client are never trusted.
pub async fn create_invoice(
    pool: &PgPool,
    user_id: Uuid,
    input: CreateInvoice,
) -> Result<(Invoice, Vec<InvoiceItem>), sqlx::Error> {
    let amounts: Vec<LineAmounts> = input.items.iter().map(LineAmounts::from).collect();
    let totals = compute_totals(&amounts, input.tax_rate, input.additional_discount);

    let mut tx = pool.begin().await?;

    let invoice = sqlx::query_as::<_, Invoice>(
        r#"
        INSERT INTO invoices
            (id, user_id, client_id, invoice_number, reference_number, issue_date, due_date,
             status, tax_rate, additional_discount, subtotal, line_discount_total, tax_amount,
             total_amount, notes, terms)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(input.client_id)
    .bind(&input.invoice_number)
    .bind(&input.reference_number)
    .bind(input.issue_date)
    .bind(input.due_date)
    .bind(input.status.unwrap_or(InvoiceStatus::Draft))
    .bind(input.tax_rate)
    .bind(input.additional_discount)
    .bind(totals.subtotal)
    .bind(totals.line_discount_total)
    .bind(totals.tax_amount)
    .bind(totals.grand_total)
    .bind(&input.notes)
    .bind(&input.terms)
    .fetch_one(&mut *tx)
    .await?;

    let items = insert_items(&mut tx, invoice.id, &input.items).await?;

    tx.commit().await?;
    Ok((invoice, items))
}

/// Applies a partial update and recomputes all stored totals.
///
/// When `items` is present the full item set is replaced; otherwise
/// the existing rows are kept. Totals are recomputed from the
/// effective items either way, since `tax_rate` or
/// `additional_discount` may have changed.
pub async fn update_invoice(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    input: UpdateInvoice,
) -> Result<Option<(Invoice, Vec<InvoiceItem>)>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing =
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    let existing = match existing {
        Some(invoice) => invoice,
        None => return Ok(None),
    };

    let tax_rate = input.tax_rate.unwrap_or(existing.tax_rate);
    let additional_discount = input
        .additional_discount
        .unwrap_or(existing.additional_discount);

    let replace_items = input.items.is_some();
    let item_inputs: Vec<InvoiceItemInput> = match input.items {
        Some(items) => items,
        None => fetch_items(&mut *tx, id)
            .await?
            .into_iter()
            .map(|item| InvoiceItemInput {
                description: item.description,
                quantity: item.quantity,
                unit: item.unit,
                unit_price: item.unit_price,
                discount_rate: item.discount_rate,
            })
            .collect(),
    };

    let amounts: Vec<LineAmounts> = item_inputs.iter().map(LineAmounts::from).collect();
    let totals = compute_totals(&amounts, tax_rate, additional_discount);

    let invoice = sqlx::query_as::<_, Invoice>(
        r#"
        UPDATE invoices SET
            client_id = $3,
            invoice_number = $4,
            reference_number = $5,
            issue_date = $6,
            due_date = $7,
            status = $8,
            tax_rate = $9,
            additional_discount = $10,
            subtotal = $11,
            line_discount_total = $12,
            tax_amount = $13,
            total_amount = $14,
            notes = $15,
            terms = $16,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(input.client_id.or(existing.client_id))
    .bind(input.invoice_number.unwrap_or(existing.invoice_number))
    .bind(input.reference_number.or(existing.reference_number))
    .bind(input.issue_date.unwrap_or(existing.issue_date))
    .bind(input.due_date.unwrap_or(existing.due_date))
    .bind(input.status.unwrap_or(existing.status))
    .bind(tax_rate)
    .bind(additional_discount)
    .bind(totals.subtotal)
    .bind(totals.line_discount_total)
    .bind(totals.tax_amount)
    .bind(totals.grand_total)
    .bind(input.notes.or(existing.notes))
    .bind(input.terms.or(existing.terms))
    .fetch_one(&mut *tx)
    .await?;

    let items = if replace_items {
        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, id, &item_inputs).await?
    } else {
        fetch_items(&mut *tx, id).await?
    };

    tx.commit().await?;
    Ok(Some((invoice, items)))
}

/// Deletes an invoice; line items go with it via cascade.
pub async fn delete_invoice(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
